//! Query and transform feedback objects. Neither kind is shared between contexts.

use aero_gles_protocol::gl::*;
use hashbrown::HashMap;

use super::GlClientState;
use crate::error::{fail_if, GlError, GlResult};
use crate::names::{NameState, NameTable, ObjectKind};

/// Query targets that can be active at the same time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QuerySlot {
    AnySamples,
    AnySamplesConservative,
    TransformFeedbackPrimitivesWritten,
}

impl QuerySlot {
    pub fn from_target(target: GLenum) -> Option<Self> {
        match target {
            GL_ANY_SAMPLES_PASSED => Some(Self::AnySamples),
            GL_ANY_SAMPLES_PASSED_CONSERVATIVE => Some(Self::AnySamplesConservative),
            GL_TRANSFORM_FEEDBACK_PRIMITIVES_WRITTEN => {
                Some(Self::TransformFeedbackPrimitivesWritten)
            }
            _ => None,
        }
    }

    fn is_occlusion(self) -> bool {
        matches!(self, Self::AnySamples | Self::AnySamplesConservative)
    }
}

#[derive(Debug, Default)]
pub(super) struct QueryState {
    pub(super) names: NameTable,
    /// Target each query was first begun with; a query keeps it for life.
    last_targets: HashMap<GLuint, GLenum>,
    active: HashMap<QuerySlot, GLuint>,
}

#[derive(Debug, Default)]
pub(super) struct TransformFeedbackState {
    pub(super) names: NameTable,
    bound: GLuint,
    active: bool,
    unpaused: bool,
}

impl GlClientState {
    /// `glBeginQuery` on the shadow.
    ///
    /// Only one occlusion query (either flavor) can be active at a time.
    pub fn begin_query(&mut self, target: GLenum, query: GLuint) -> GlResult {
        let slot = QuerySlot::from_target(target).ok_or(GlError::InvalidEnum)?;
        let busy = if slot.is_occlusion() {
            self.queries.active.contains_key(&QuerySlot::AnySamples)
                || self.queries.active.contains_key(&QuerySlot::AnySamplesConservative)
        } else {
            self.queries.active.contains_key(&slot)
        };
        fail_if(busy, GlError::InvalidOperation)?;
        fail_if(
            self.queries
                .last_targets
                .get(&query)
                .is_some_and(|&t| t != target),
            GlError::InvalidOperation,
        )?;
        fail_if(query == 0, GlError::InvalidOperation)?;
        fail_if(!self.exists(ObjectKind::Query, query), GlError::InvalidOperation)?;

        self.queries.last_targets.insert(query, target);
        self.queries.active.insert(slot, query);
        self.queries.names.mark_bound(query);
        Ok(())
    }

    pub fn end_query(&mut self, target: GLenum) -> GlResult {
        let slot = QuerySlot::from_target(target).ok_or(GlError::InvalidEnum)?;
        self.queries
            .active
            .remove(&slot)
            .map(drop)
            .ok_or(GlError::InvalidOperation)
    }

    /// Query active on `target`, 0 when none (`GL_CURRENT_QUERY`).
    pub fn current_query(&self, target: GLenum) -> GlResult<GLuint> {
        let slot = QuerySlot::from_target(target).ok_or(GlError::InvalidEnum)?;
        Ok(self.queries.active.get(&slot).copied().unwrap_or(0))
    }

    pub fn is_query_active(&self, query: GLuint) -> bool {
        query != 0 && self.queries.active.values().any(|&q| q == query)
    }

    /// `glIsQuery`: the name has been begun at least once.
    pub fn is_query(&self, query: GLuint) -> bool {
        query != 0 && self.queries.names.state(query) == NameState::UsedAndBound
    }

    /// Deleting an active query ends it.
    pub fn delete_query(&mut self, query: GLuint) {
        if query == 0 {
            return;
        }
        self.queries.active.retain(|_, q| *q != query);
        self.queries.last_targets.remove(&query);
        self.set_existence(ObjectKind::Query, false, &[query]);
    }

    /// `glBindTransformFeedback` on the shadow.
    pub fn bind_transform_feedback(&mut self, target: GLenum, tf: GLuint) -> GlResult {
        fail_if(target != GL_TRANSFORM_FEEDBACK, GlError::InvalidEnum)?;
        fail_if(self.tf.active && self.tf.unpaused, GlError::InvalidOperation)?;
        fail_if(
            tf != 0 && !self.exists(ObjectKind::TransformFeedback, tf),
            GlError::InvalidOperation,
        )?;
        self.tf.bound = tf;
        if tf != 0 {
            self.tf.names.mark_bound(tf);
        }
        Ok(())
    }

    pub fn bound_transform_feedback(&self) -> GLuint {
        self.tf.bound
    }

    pub fn is_transform_feedback(&self, tf: GLuint) -> bool {
        tf != 0 && self.tf.names.state(tf) == NameState::UsedAndBound
    }

    /// `glBeginTransformFeedback`: needs a current program and no active session.
    pub fn begin_transform_feedback(&mut self, primitive_mode: GLenum) -> GlResult {
        fail_if(
            !matches!(primitive_mode, GL_POINTS | GL_LINES | GL_TRIANGLES),
            GlError::InvalidEnum,
        )?;
        fail_if(self.tf.active, GlError::InvalidOperation)?;
        fail_if(self.current_program == 0, GlError::InvalidOperation)?;
        self.tf.active = true;
        self.tf.unpaused = true;
        Ok(())
    }

    pub fn end_transform_feedback(&mut self) -> GlResult {
        fail_if(!self.tf.active, GlError::InvalidOperation)?;
        self.tf.active = false;
        self.tf.unpaused = false;
        Ok(())
    }

    pub fn pause_transform_feedback(&mut self) -> GlResult {
        fail_if(!self.tf.active || !self.tf.unpaused, GlError::InvalidOperation)?;
        self.tf.unpaused = false;
        Ok(())
    }

    pub fn resume_transform_feedback(&mut self) -> GlResult {
        fail_if(!self.tf.active || self.tf.unpaused, GlError::InvalidOperation)?;
        self.tf.unpaused = true;
        Ok(())
    }

    pub fn transform_feedback_active(&self) -> bool {
        self.tf.active
    }

    pub fn transform_feedback_unpaused(&self) -> bool {
        self.tf.unpaused
    }

    /// Active and not paused: draws feed the bound transform feedback buffers.
    pub fn transform_feedback_capturing(&self) -> bool {
        self.tf.active && self.tf.unpaused
    }

    /// `glDeleteTransformFeedbacks`: refused while a session is active.
    pub fn delete_transform_feedbacks(&mut self, ids: &[GLuint]) -> GlResult {
        fail_if(self.tf.active, GlError::InvalidOperation)?;
        if ids.contains(&self.tf.bound) {
            self.tf.bound = 0;
        }
        let ids: Vec<GLuint> = ids.iter().copied().filter(|&id| id != 0).collect();
        self.set_existence(ObjectKind::TransformFeedback, false, &ids);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::caps::HostCaps;
    use crate::share_group::ShareGroup;

    fn state() -> GlClientState {
        GlClientState::new(ShareGroup::new(), HostCaps::default(), (3, 0))
    }

    #[test]
    fn occlusion_query_flavors_exclude_each_other() {
        let mut s = state();
        s.set_existence(ObjectKind::Query, true, &[1, 2, 3]);
        s.begin_query(GL_ANY_SAMPLES_PASSED, 1).unwrap();
        assert_eq!(
            s.begin_query(GL_ANY_SAMPLES_PASSED_CONSERVATIVE, 2),
            Err(GlError::InvalidOperation)
        );
        s.begin_query(GL_TRANSFORM_FEEDBACK_PRIMITIVES_WRITTEN, 3).unwrap();
        assert_eq!(s.current_query(GL_ANY_SAMPLES_PASSED), Ok(1));

        s.end_query(GL_ANY_SAMPLES_PASSED).unwrap();
        assert_eq!(s.end_query(GL_ANY_SAMPLES_PASSED), Err(GlError::InvalidOperation));
        assert_eq!(s.end_query(0x1234), Err(GlError::InvalidEnum));
    }

    #[test]
    fn a_query_keeps_its_first_target() {
        let mut s = state();
        s.set_existence(ObjectKind::Query, true, &[1]);
        assert!(!s.is_query(1));
        s.begin_query(GL_ANY_SAMPLES_PASSED, 1).unwrap();
        s.end_query(GL_ANY_SAMPLES_PASSED).unwrap();
        assert!(s.is_query(1));
        assert_eq!(
            s.begin_query(GL_TRANSFORM_FEEDBACK_PRIMITIVES_WRITTEN, 1),
            Err(GlError::InvalidOperation)
        );
        assert_eq!(s.begin_query(GL_ANY_SAMPLES_PASSED, 0), Err(GlError::InvalidOperation));
        assert_eq!(s.begin_query(GL_ANY_SAMPLES_PASSED, 9), Err(GlError::InvalidOperation));
    }

    #[test]
    fn transform_feedback_pause_resume_cycle() {
        let mut s = state();
        assert_eq!(s.begin_transform_feedback(GL_TRIANGLES), Err(GlError::InvalidOperation));
        s.set_current_program(4);
        assert_eq!(s.begin_transform_feedback(GL_TRIANGLE_STRIP), Err(GlError::InvalidEnum));
        s.begin_transform_feedback(GL_TRIANGLES).unwrap();
        assert_eq!(s.resume_transform_feedback(), Err(GlError::InvalidOperation));
        assert_eq!(
            s.bind_transform_feedback(GL_TRANSFORM_FEEDBACK, 0),
            Err(GlError::InvalidOperation)
        );
        s.pause_transform_feedback().unwrap();
        assert_eq!(s.get_integer(GL_TRANSFORM_FEEDBACK_PAUSED), Some(1));
        s.bind_transform_feedback(GL_TRANSFORM_FEEDBACK, 0).unwrap();
        assert_eq!(s.delete_transform_feedbacks(&[1]), Err(GlError::InvalidOperation));
        s.resume_transform_feedback().unwrap();
        s.end_transform_feedback().unwrap();
        assert_eq!(s.end_transform_feedback(), Err(GlError::InvalidOperation));
    }

    #[test]
    fn deleting_the_bound_transform_feedback_rebinds_zero() {
        let mut s = state();
        s.set_existence(ObjectKind::TransformFeedback, true, &[2]);
        s.bind_transform_feedback(GL_TRANSFORM_FEEDBACK, 2).unwrap();
        assert!(s.is_transform_feedback(2));
        s.delete_transform_feedbacks(&[2]).unwrap();
        assert_eq!(s.bound_transform_feedback(), 0);
        assert_eq!(
            s.bind_transform_feedback(GL_TRANSFORM_FEEDBACK, 2),
            Err(GlError::InvalidOperation)
        );
    }
}
