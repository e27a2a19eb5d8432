use aero_gles_protocol::gl::*;
use aero_gles_protocol::{GlesOpcode, Transport};

use crate::wire::GlesWire;

gles_family! {
    /// Queries, transform feedback objects, samplers and fence syncs.
    pub trait ObjectApi {
        commands {
            fn delete_queries(queries: &[GLuint]) = DeleteQueries;
            fn begin_query(target: GLenum, query: GLuint) = BeginQuery;
            fn end_query(target: GLenum) = EndQuery;
            fn delete_transform_feedbacks(ids: &[GLuint]) = DeleteTransformFeedbacks;
            fn bind_transform_feedback(target: GLenum, id: GLuint) = BindTransformFeedback;
            fn begin_transform_feedback(primitive_mode: GLenum) = BeginTransformFeedback;
            fn end_transform_feedback() = EndTransformFeedback;
            fn pause_transform_feedback() = PauseTransformFeedback;
            fn resume_transform_feedback() = ResumeTransformFeedback;
            fn delete_samplers(samplers: &[GLuint]) = DeleteSamplers;
            fn bind_sampler(unit: GLuint, sampler: GLuint) = BindSampler;
            fn sampler_parameteri(sampler: GLuint, pname: GLenum, param: GLint) = SamplerParameteri;
            fn sampler_parameterf(sampler: GLuint, pname: GLenum, param: GLfloat) = SamplerParameterf;
            fn sampler_parameteriv(sampler: GLuint, pname: GLenum, params: &[GLint]) = SamplerParameteriv;
            fn sampler_parameterfv(sampler: GLuint, pname: GLenum, params: &[GLfloat]) = SamplerParameterfv;
            fn wait_sync(sync: GLsync, flags: GLbitfield, timeout: GLuint64) = WaitSync;
            fn delete_sync(sync: GLsync) = DeleteSync;
        }
        returns {
            fn is_query(query: GLuint) -> bool = IsQuery;
            fn is_transform_feedback(id: GLuint) -> bool = IsTransformFeedback;
            fn is_sampler(sampler: GLuint) -> bool = IsSampler;
            fn is_sync(sync: GLsync) -> bool = IsSync;
            fn client_wait_sync(sync: GLsync, flags: GLbitfield, timeout: GLuint64) -> GLenum = ClientWaitSync;
        }
        outputs {
            fn get_queryiv(target: GLenum, pname: GLenum; out: &mut [GLint]) = GetQueryiv;
            fn get_query_objectuiv(query: GLuint, pname: GLenum; out: &mut [GLuint]) = GetQueryObjectuiv;
            fn get_sampler_parameteriv(sampler: GLuint, pname: GLenum; out: &mut [GLint]) = GetSamplerParameteriv;
            fn get_sampler_parameterfv(sampler: GLuint, pname: GLenum; out: &mut [GLfloat]) = GetSamplerParameterfv;
            fn get_synciv(sync: GLsync, pname: GLenum; out: &mut [GLint]) = GetSynciv;
        }
        uploads {}
        gens {
            fn gen_queries = GenQueries;
            fn gen_transform_feedbacks = GenTransformFeedbacks;
            fn gen_samplers = GenSamplers;
        }
        provided {
            /// Sync handles are allocated in the guest, so every encoder needs a registry to
            /// create one.
            fn fence_sync(&mut self, condition: GLenum, flags: GLbitfield) -> GLsync;
        }
    }
}

impl<T: Transport> GlesWire<T> {
    /// `FenceSync` carrying the guest-allocated handle the host must associate with the fence.
    pub fn fence_sync_with(&mut self, condition: GLenum, flags: GLbitfield, sync: GLsync) {
        self.command(GlesOpcode::FenceSync, &[&condition, &flags, &sync]);
    }
}
