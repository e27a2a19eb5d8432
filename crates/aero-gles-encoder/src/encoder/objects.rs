//! Queries, transform feedback, samplers and fence syncs.

use aero_gles_protocol::gl::*;
use aero_gles_protocol::Transport;
use aero_gles_state::{fail_if, GlError, GlResult, ObjectKind, QuerySlot};
use tracing::debug;

use super::Gl2Encoder;
use crate::api::ObjectApi;

fn is_sampler_pname(pname: GLenum) -> bool {
    matches!(
        pname,
        GL_TEXTURE_MIN_FILTER
            | GL_TEXTURE_MAG_FILTER
            | GL_TEXTURE_WRAP_S
            | GL_TEXTURE_WRAP_T
            | GL_TEXTURE_WRAP_R
            | GL_TEXTURE_MIN_LOD
            | GL_TEXTURE_MAX_LOD
            | GL_TEXTURE_COMPARE_MODE
            | GL_TEXTURE_COMPARE_FUNC
            | GL_TEXTURE_MAX_ANISOTROPY_EXT
    )
}

fn is_sync_pname(pname: GLenum) -> bool {
    matches!(
        pname,
        GL_OBJECT_TYPE | GL_SYNC_STATUS | GL_SYNC_CONDITION | GL_SYNC_FLAGS
    )
}

impl<T: Transport> Gl2Encoder<T> {
    fn check_sampler_access(&self, sampler: GLuint, pname: GLenum) -> GlResult {
        fail_if(!self.state.is_sampler(sampler), GlError::InvalidOperation)?;
        fail_if(!is_sampler_pname(pname), GlError::InvalidEnum)
    }

    /// Sampler parameters share the texture value rules, minus the per-texture ones.
    fn check_sampler_parameter(&self, sampler: GLuint, pname: GLenum, value: GLint) -> GlResult {
        self.check_sampler_access(sampler, pname)?;
        self.check_tex_parameter(GL_TEXTURE_2D, pname, value)
    }

    fn try_bind_sampler(&mut self, unit: GLuint, sampler: GLuint) -> GlResult {
        fail_if(
            unit as usize >= self.state.texture_unit_count(),
            GlError::InvalidValue,
        )?;
        fail_if(
            sampler != 0 && !self.state.is_sampler(sampler),
            GlError::InvalidOperation,
        )?;
        if self.state.is_sampler_bind_noop(unit, sampler) {
            debug!(unit, sampler, "sampler bind elided");
            return Ok(());
        }
        self.state.bind_sampler(unit, sampler)?;
        self.wire.bind_sampler(unit, sampler);
        Ok(())
    }

    fn try_fence_sync(&mut self, condition: GLenum, flags: GLbitfield) -> GlResult<GLsync> {
        fail_if(condition != GL_SYNC_GPU_COMMANDS_COMPLETE, GlError::InvalidEnum)?;
        fail_if(flags != 0, GlError::InvalidValue)?;
        let sync = self.fences.create();
        self.wire.fence_sync_with(condition, flags, sync);
        debug!(sync, live = self.fences.len(), "fence created");
        Ok(sync)
    }

    fn try_client_wait_sync(
        &mut self,
        sync: GLsync,
        flags: GLbitfield,
        timeout: GLuint64,
    ) -> GlResult<GLenum> {
        fail_if(!self.fences.contains(sync), GlError::InvalidValue)?;
        fail_if(
            flags & !GL_SYNC_FLUSH_COMMANDS_BIT != 0,
            GlError::InvalidValue,
        )?;
        Ok(self.wire.client_wait_sync(sync, flags, timeout))
    }

    fn try_wait_sync(&mut self, sync: GLsync, flags: GLbitfield, timeout: GLuint64) -> GlResult {
        fail_if(flags != 0, GlError::InvalidValue)?;
        fail_if(timeout != GL_TIMEOUT_IGNORED, GlError::InvalidValue)?;
        fail_if(!self.fences.contains(sync), GlError::InvalidValue)?;
        self.wire.wait_sync(sync, flags, timeout);
        Ok(())
    }

    fn try_delete_sync(&mut self, sync: GLsync) -> GlResult {
        if sync == 0 {
            return Ok(());
        }
        fail_if(!self.fences.remove(sync), GlError::InvalidValue)?;
        self.wire.delete_sync(sync);
        Ok(())
    }

    fn try_get_query_objectuiv(&mut self, query: GLuint, pname: GLenum, out: &mut [GLuint]) -> GlResult {
        fail_if(
            !matches!(pname, GL_QUERY_RESULT | GL_QUERY_RESULT_AVAILABLE),
            GlError::InvalidEnum,
        )?;
        fail_if(!self.state.is_query(query), GlError::InvalidOperation)?;
        fail_if(self.state.is_query_active(query), GlError::InvalidOperation)?;
        self.wire.get_query_objectuiv(query, pname, out);
        Ok(())
    }
}

impl<T: Transport> ObjectApi for Gl2Encoder<T> {
    fn gen_queries(&mut self, n: GLsizei) -> Vec<GLuint> {
        self.guarded("glGenQueries", |e| {
            fail_if(n < 0, GlError::InvalidValue)?;
            let names = e.wire.gen_queries(n);
            e.state.set_existence(ObjectKind::Query, true, &names);
            Ok(names)
        })
    }

    fn delete_queries(&mut self, queries: &[GLuint]) {
        for &q in queries {
            self.state.delete_query(q);
        }
        self.wire.delete_queries(queries);
    }

    fn is_query(&mut self, query: GLuint) -> bool {
        self.state.is_query(query)
    }

    fn begin_query(&mut self, target: GLenum, query: GLuint) {
        self.guarded("glBeginQuery", |e| {
            e.state.begin_query(target, query)?;
            e.wire.begin_query(target, query);
            Ok(())
        })
    }

    fn end_query(&mut self, target: GLenum) {
        self.guarded("glEndQuery", |e| {
            e.state.end_query(target)?;
            e.wire.end_query(target);
            Ok(())
        })
    }

    fn get_queryiv(&mut self, target: GLenum, pname: GLenum, out: &mut [GLint]) {
        self.guarded("glGetQueryiv", |e| {
            fail_if(QuerySlot::from_target(target).is_none(), GlError::InvalidEnum)?;
            fail_if(pname != GL_CURRENT_QUERY, GlError::InvalidEnum)?;
            let current = e.state.current_query(target)?;
            if let Some(slot) = out.first_mut() {
                *slot = current as GLint;
            }
            Ok(())
        })
    }

    fn get_query_objectuiv(&mut self, query: GLuint, pname: GLenum, out: &mut [GLuint]) {
        self.guarded("glGetQueryObjectuiv", |e| e.try_get_query_objectuiv(query, pname, out))
    }

    fn gen_transform_feedbacks(&mut self, n: GLsizei) -> Vec<GLuint> {
        self.guarded("glGenTransformFeedbacks", |e| {
            fail_if(n < 0, GlError::InvalidValue)?;
            let names = e.wire.gen_transform_feedbacks(n);
            e.state
                .set_existence(ObjectKind::TransformFeedback, true, &names);
            Ok(names)
        })
    }

    fn delete_transform_feedbacks(&mut self, ids: &[GLuint]) {
        self.guarded("glDeleteTransformFeedbacks", |e| {
            e.state.delete_transform_feedbacks(ids)?;
            e.wire.delete_transform_feedbacks(ids);
            Ok(())
        })
    }

    fn bind_transform_feedback(&mut self, target: GLenum, id: GLuint) {
        self.guarded("glBindTransformFeedback", |e| {
            e.state.bind_transform_feedback(target, id)?;
            e.wire.bind_transform_feedback(target, id);
            Ok(())
        })
    }

    fn is_transform_feedback(&mut self, id: GLuint) -> bool {
        self.state.is_transform_feedback(id)
    }

    fn begin_transform_feedback(&mut self, primitive_mode: GLenum) {
        self.guarded("glBeginTransformFeedback", |e| {
            e.state.begin_transform_feedback(primitive_mode)?;
            e.wire.begin_transform_feedback(primitive_mode);
            Ok(())
        })
    }

    fn end_transform_feedback(&mut self) {
        self.guarded("glEndTransformFeedback", |e| {
            e.state.end_transform_feedback()?;
            e.wire.end_transform_feedback();
            Ok(())
        })
    }

    fn pause_transform_feedback(&mut self) {
        self.guarded("glPauseTransformFeedback", |e| {
            e.state.pause_transform_feedback()?;
            e.wire.pause_transform_feedback();
            Ok(())
        })
    }

    fn resume_transform_feedback(&mut self) {
        self.guarded("glResumeTransformFeedback", |e| {
            e.state.resume_transform_feedback()?;
            e.wire.resume_transform_feedback();
            Ok(())
        })
    }

    fn gen_samplers(&mut self, n: GLsizei) -> Vec<GLuint> {
        self.guarded("glGenSamplers", |e| {
            fail_if(n < 0, GlError::InvalidValue)?;
            let names = e.wire.gen_samplers(n);
            e.state.set_existence(ObjectKind::Sampler, true, &names);
            Ok(names)
        })
    }

    fn delete_samplers(&mut self, samplers: &[GLuint]) {
        for &s in samplers {
            self.state.delete_sampler(s);
        }
        self.wire.delete_samplers(samplers);
    }

    fn bind_sampler(&mut self, unit: GLuint, sampler: GLuint) {
        self.guarded("glBindSampler", |e| e.try_bind_sampler(unit, sampler))
    }

    fn is_sampler(&mut self, sampler: GLuint) -> bool {
        self.state.is_sampler(sampler)
    }

    fn sampler_parameteri(&mut self, sampler: GLuint, pname: GLenum, param: GLint) {
        self.guarded("glSamplerParameteri", |e| {
            e.check_sampler_parameter(sampler, pname, param)?;
            e.wire.sampler_parameteri(sampler, pname, param);
            Ok(())
        })
    }

    fn sampler_parameterf(&mut self, sampler: GLuint, pname: GLenum, param: GLfloat) {
        self.guarded("glSamplerParameterf", |e| {
            e.check_sampler_parameter(sampler, pname, param as GLint)?;
            e.wire.sampler_parameterf(sampler, pname, param);
            Ok(())
        })
    }

    fn sampler_parameteriv(&mut self, sampler: GLuint, pname: GLenum, params: &[GLint]) {
        self.guarded("glSamplerParameteriv", |e| {
            let first = params.first().copied().ok_or(GlError::InvalidValue)?;
            e.check_sampler_parameter(sampler, pname, first)?;
            e.wire.sampler_parameteriv(sampler, pname, params);
            Ok(())
        })
    }

    fn sampler_parameterfv(&mut self, sampler: GLuint, pname: GLenum, params: &[GLfloat]) {
        self.guarded("glSamplerParameterfv", |e| {
            let first = params.first().copied().ok_or(GlError::InvalidValue)?;
            e.check_sampler_parameter(sampler, pname, first as GLint)?;
            e.wire.sampler_parameterfv(sampler, pname, params);
            Ok(())
        })
    }

    fn get_sampler_parameteriv(&mut self, sampler: GLuint, pname: GLenum, out: &mut [GLint]) {
        self.guarded("glGetSamplerParameteriv", |e| {
            e.check_sampler_access(sampler, pname)?;
            e.safe_host_query(out, |w, o| w.get_sampler_parameteriv(sampler, pname, o));
            Ok(())
        })
    }

    fn get_sampler_parameterfv(&mut self, sampler: GLuint, pname: GLenum, out: &mut [GLfloat]) {
        self.guarded("glGetSamplerParameterfv", |e| {
            e.check_sampler_access(sampler, pname)?;
            e.safe_host_query(out, |w, o| w.get_sampler_parameterfv(sampler, pname, o));
            Ok(())
        })
    }

    fn fence_sync(&mut self, condition: GLenum, flags: GLbitfield) -> GLsync {
        self.guarded("glFenceSync", |e| e.try_fence_sync(condition, flags))
    }

    fn client_wait_sync(&mut self, sync: GLsync, flags: GLbitfield, timeout: GLuint64) -> GLenum {
        self.guarded("glClientWaitSync", |e| {
            e.try_client_wait_sync(sync, flags, timeout).map(Some)
        })
        .unwrap_or(GL_WAIT_FAILED)
    }

    fn wait_sync(&mut self, sync: GLsync, flags: GLbitfield, timeout: GLuint64) {
        self.guarded("glWaitSync", |e| e.try_wait_sync(sync, flags, timeout))
    }

    fn delete_sync(&mut self, sync: GLsync) {
        self.guarded("glDeleteSync", |e| e.try_delete_sync(sync))
    }

    fn is_sync(&mut self, sync: GLsync) -> bool {
        sync != 0 && self.fences.contains(sync)
    }

    fn get_synciv(&mut self, sync: GLsync, pname: GLenum, out: &mut [GLint]) {
        self.guarded("glGetSynciv", |e| {
            fail_if(!is_sync_pname(pname), GlError::InvalidEnum)?;
            fail_if(!e.fences.contains(sync), GlError::InvalidValue)?;
            e.wire.get_synciv(sync, pname, out);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use aero_gles_protocol::GlesOpcode;
    use pretty_assertions::assert_eq;

    use super::super::test_support::*;
    use super::*;
    use crate::api::ProgramApi;

    #[test]
    fn queries_must_be_begun_before_results_are_read() {
        let mut enc = encoder();
        enc.transport_mut().push_reply_u32(5);
        let q = enc.gen_queries(1)[0];
        assert!(!enc.is_query(q));

        let mut out = [0u32];
        enc.get_query_objectuiv(q, GL_QUERY_RESULT, &mut out);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));

        enc.begin_query(GL_ANY_SAMPLES_PASSED, q);
        assert!(enc.is_query(q));
        let mut current = [0];
        enc.get_queryiv(GL_ANY_SAMPLES_PASSED, GL_CURRENT_QUERY, &mut current);
        assert_eq!(current, [q as GLint]);

        // Still active.
        enc.get_query_objectuiv(q, GL_QUERY_RESULT_AVAILABLE, &mut out);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));

        enc.end_query(GL_ANY_SAMPLES_PASSED);
        clear(&mut enc);
        enc.transport_mut().push_reply_u32(1);
        enc.get_query_objectuiv(q, GL_QUERY_RESULT_AVAILABLE, &mut out);
        assert_eq!(out, [1]);
        assert_eq!(opcodes(&mut enc), vec![GlesOpcode::GetQueryObjectuiv]);
        assert_eq!(take_error(&mut enc), None);
    }

    #[test]
    fn occlusion_targets_share_one_slot() {
        let mut enc = encoder();
        enc.transport_mut().push_reply_u32s(&[1, 2]);
        let qs = enc.gen_queries(2);
        enc.begin_query(GL_ANY_SAMPLES_PASSED, qs[0]);
        enc.begin_query(GL_ANY_SAMPLES_PASSED_CONSERVATIVE, qs[1]);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
    }

    #[test]
    fn redundant_sampler_binds_are_elided() {
        let mut enc = encoder();
        enc.transport_mut().push_reply_u32(4);
        let s = enc.gen_samplers(1)[0];
        clear(&mut enc);

        enc.bind_sampler(0, s);
        enc.bind_sampler(0, s);
        enc.bind_sampler(0, 77);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.bind_sampler(1000, s);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        assert_eq!(opcodes(&mut enc), vec![GlesOpcode::BindSampler]);
        assert!(enc.is_sampler(s));
    }

    #[test]
    fn sampler_parameters_reject_texture_only_names() {
        let mut enc = encoder();
        enc.transport_mut().push_reply_u32(4);
        let s = enc.gen_samplers(1)[0];
        clear(&mut enc);

        enc.sampler_parameteri(s, GL_TEXTURE_BASE_LEVEL, 1);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));
        enc.sampler_parameteri(s, GL_TEXTURE_MIN_FILTER, GL_RED as GLint);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));
        enc.sampler_parameterfv(s, GL_TEXTURE_MIN_LOD, &[]);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        enc.sampler_parameteri(9, GL_TEXTURE_MIN_FILTER, GL_LINEAR as GLint);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));

        enc.sampler_parameteri(s, GL_TEXTURE_WRAP_R, GL_MIRRORED_REPEAT as GLint);
        assert_eq!(opcodes(&mut enc), vec![GlesOpcode::SamplerParameteri]);
    }

    #[test]
    fn deleted_samplers_leave_their_units() {
        let mut enc = encoder();
        enc.transport_mut().push_reply_u32(4);
        let s = enc.gen_samplers(1)[0];
        enc.bind_sampler(2, s);
        enc.delete_samplers(&[s]);
        assert!(!enc.is_sampler(s));
        assert!(enc.state().is_sampler_bind_noop(2, 0));
    }

    #[test]
    fn fences_are_tracked_in_the_guest() {
        let mut enc = encoder();
        assert_eq!(enc.fence_sync(0x1234, 0), 0);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));
        assert_eq!(enc.fence_sync(GL_SYNC_GPU_COMMANDS_COMPLETE, 1), 0);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));

        let sync = enc.fence_sync(GL_SYNC_GPU_COMMANDS_COMPLETE, 0);
        assert_ne!(sync, 0);
        assert!(enc.is_sync(sync));

        enc.transport_mut().push_reply_u32(GL_ALREADY_SIGNALED);
        assert_eq!(
            enc.client_wait_sync(sync, GL_SYNC_FLUSH_COMMANDS_BIT, 0),
            GL_ALREADY_SIGNALED
        );
        assert_eq!(enc.client_wait_sync(sync, 2, 0), GL_WAIT_FAILED);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));

        enc.wait_sync(sync, 0, 5);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        enc.wait_sync(sync, 0, GL_TIMEOUT_IGNORED);

        enc.delete_sync(sync);
        assert!(!enc.is_sync(sync));
        enc.delete_sync(sync);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        assert_eq!(enc.client_wait_sync(sync, 0, 0), GL_WAIT_FAILED);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));

        assert_eq!(
            opcodes(&mut enc),
            vec![
                GlesOpcode::FenceSync,
                GlesOpcode::ClientWaitSync,
                GlesOpcode::WaitSync,
                GlesOpcode::DeleteSync,
            ]
        );
    }

    #[test]
    fn sync_queries_check_the_pname_first() {
        let mut enc = encoder();
        let mut out = [0];
        enc.get_synciv(42, GL_SYNC_FENCE, &mut out);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));
        enc.get_synciv(42, GL_SYNC_STATUS, &mut out);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
    }

    #[test]
    fn transform_feedback_objects_follow_the_session() {
        let mut enc = encoder();
        enc.transport_mut().push_reply_u32(3);
        let tf = enc.gen_transform_feedbacks(1)[0];
        enc.bind_transform_feedback(GL_TRANSFORM_FEEDBACK, tf);
        assert!(enc.is_transform_feedback(tf));

        // No program is current.
        enc.begin_transform_feedback(GL_TRIANGLES);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));

        enc.transport_mut().push_reply_u32(10);
        let program = enc.create_program();
        enc.use_program(program);
        enc.begin_transform_feedback(GL_TRIANGLES);
        enc.delete_transform_feedbacks(&[tf]);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.pause_transform_feedback();
        enc.resume_transform_feedback();
        enc.end_transform_feedback();
        enc.delete_transform_feedbacks(&[tf]);
        assert_eq!(take_error(&mut enc), None);
        assert!(!enc.is_transform_feedback(tf));
    }
}
