use aero_gles_protocol::gl::*;
use hashbrown::HashMap;

use super::GlClientState;
use crate::caps::HostCaps;
use crate::error::{fail_if, GlError, GlResult};
use crate::names::{NameState, NameTable, ObjectKind};
use crate::program::uniform_type_info;
use crate::vao::{VaoState, VertexPointer};

/// Vertex array objects of one context. The bound VAO is held by value in `current`; the
/// others wait in `stored` until they are bound again.
#[derive(Debug)]
pub(super) struct VertexArrayState {
    pub(super) names: NameTable,
    pub(super) current_id: GLuint,
    pub(super) current: VaoState,
    stored: HashMap<GLuint, VaoState>,
    max_attribs: usize,
    max_bindings: usize,
}

impl VertexArrayState {
    pub(super) fn new(caps: &HostCaps) -> Self {
        let max_attribs = usize::try_from(caps.max_vertex_attribs).unwrap_or(16);
        let max_bindings = usize::try_from(caps.max_vertex_attrib_bindings).unwrap_or(max_attribs);
        Self {
            names: NameTable::new(),
            current_id: 0,
            current: VaoState::new(max_attribs, max_bindings),
            stored: HashMap::new(),
            max_attribs,
            max_bindings,
        }
    }

    fn fresh(&self) -> VaoState {
        VaoState::new(self.max_attribs, self.max_bindings)
    }
}

impl GlClientState {
    pub fn max_vertex_attribs(&self) -> usize {
        self.vao.max_attribs
    }

    /// Records names returned by `glGenVertexArrays`.
    pub fn add_vertex_arrays(&mut self, ids: &[GLuint]) {
        for &id in ids.iter().filter(|&&id| id != 0) {
            let fresh = self.vao.fresh();
            self.vao.stored.entry(id).or_insert(fresh);
        }
        self.set_existence(ObjectKind::VertexArray, true, ids);
    }

    /// `glBindVertexArray` on the shadow. Unknown names are `INVALID_OPERATION`.
    pub fn bind_vertex_array(&mut self, vao: GLuint) -> GlResult {
        if vao == self.vao.current_id {
            return Ok(());
        }
        fail_if(
            vao != 0 && !self.exists(ObjectKind::VertexArray, vao),
            GlError::InvalidOperation,
        )?;
        let incoming = self
            .vao
            .stored
            .remove(&vao)
            .unwrap_or_else(|| self.vao.fresh());
        let outgoing = std::mem::replace(&mut self.vao.current, incoming);
        self.vao.stored.insert(self.vao.current_id, outgoing);
        self.vao.current_id = vao;
        if vao != 0 {
            self.vao.names.mark_bound(vao);
        }
        Ok(())
    }

    pub fn bound_vertex_array(&self) -> GLuint {
        self.vao.current_id
    }

    pub fn is_vertex_array(&self, vao: GLuint) -> bool {
        vao != 0 && self.vao.names.state(vao) == NameState::UsedAndBound
    }

    /// Deletes a VAO; deleting the bound one falls back to VAO 0, which cannot be deleted.
    pub fn delete_vertex_array(&mut self, vao: GLuint) {
        if vao == 0 {
            return;
        }
        if self.vao.current_id == vao {
            // Binding 0 cannot fail.
            let _ = self.bind_vertex_array(0);
        }
        self.vao.stored.remove(&vao);
        self.set_existence(ObjectKind::VertexArray, false, &[vao]);
    }

    pub fn current_vao(&self) -> &VaoState {
        &self.vao.current
    }

    pub fn current_vao_mut(&mut self) -> &mut VaoState {
        &mut self.vao.current
    }

    /// `glVertexAttrib{I}Pointer`: `ARRAY_BUFFER` as currently bound is captured for `index`.
    #[allow(clippy::too_many_arguments)]
    pub fn set_vertex_attrib_pointer(
        &mut self,
        index: usize,
        size: GLint,
        ty: GLenum,
        normalized: bool,
        stride: GLsizei,
        is_int: bool,
        pointer: VertexPointer,
    ) {
        let buffer = self.bound_buffer(GL_ARRAY_BUFFER).unwrap_or(0);
        self.vao
            .current
            .set_pointer(index, size, ty, normalized, stride, is_int, buffer, pointer);
    }

    /// Whether the current program reads attribute `index`. Without a linked program every
    /// attribute counts as read.
    pub fn is_attrib_used_by_program(&self, index: usize) -> bool {
        let Some(program) = self.current_program_ref() else {
            return true;
        };
        let program = program.read();
        if !program.linked {
            return true;
        }
        program.attribs.iter().any(|a| {
            let Ok(first) = usize::try_from(a.location) else {
                return false;
            };
            let columns = uniform_type_info(a.ty).map_or(1, |t| usize::from(t.columns));
            let slots = usize::try_from(a.size).unwrap_or(1).max(1) * columns;
            (first..first + slots).contains(&index)
        })
    }

    /// `glGetVertexAttribiv` for the locally tracked pnames.
    pub fn vertex_attrib_query(&self, index: usize, pname: GLenum) -> GlResult<Option<GLint>> {
        let vao = &self.vao.current;
        let attrib = vao.attribs.get(index).ok_or(GlError::InvalidValue)?;
        let binding = vao.binding_for(index).copied().unwrap_or_default();
        let v = match pname {
            GL_VERTEX_ATTRIB_ARRAY_ENABLED => GLint::from(attrib.enabled),
            GL_VERTEX_ATTRIB_ARRAY_SIZE => attrib.size,
            GL_VERTEX_ATTRIB_ARRAY_STRIDE => attrib.stride,
            GL_VERTEX_ATTRIB_ARRAY_TYPE => attrib.ty as GLint,
            GL_VERTEX_ATTRIB_ARRAY_NORMALIZED => GLint::from(attrib.normalized),
            GL_VERTEX_ATTRIB_ARRAY_INTEGER if self.is_es3() => GLint::from(attrib.is_int),
            GL_VERTEX_ATTRIB_ARRAY_DIVISOR if self.is_es3() => binding.divisor as GLint,
            GL_VERTEX_ATTRIB_ARRAY_BUFFER_BINDING => binding.buffer as GLint,
            GL_VERTEX_ATTRIB_BINDING if self.is_es31() => attrib.binding_index as GLint,
            GL_VERTEX_ATTRIB_RELATIVE_OFFSET if self.is_es31() => attrib.relative_offset as GLint,
            _ => return Ok(None),
        };
        Ok(Some(v))
    }

    /// `glGetIntegeri_v`/`glGetInteger64i_v` for the `VERTEX_BINDING_*` pnames.
    pub fn vertex_binding_query(&self, pname: GLenum, index: usize) -> GlResult<Option<i64>> {
        if !matches!(
            pname,
            GL_VERTEX_BINDING_BUFFER
                | GL_VERTEX_BINDING_OFFSET
                | GL_VERTEX_BINDING_STRIDE
                | GL_VERTEX_BINDING_DIVISOR
        ) {
            return Ok(None);
        }
        let b = self
            .vao
            .current
            .bindings
            .get(index)
            .ok_or(GlError::InvalidValue)?;
        let v = match pname {
            GL_VERTEX_BINDING_BUFFER => i64::from(b.buffer),
            GL_VERTEX_BINDING_OFFSET => b.offset as i64,
            GL_VERTEX_BINDING_STRIDE => i64::from(b.stride),
            _ => i64::from(b.divisor),
        };
        Ok(Some(v))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::share_group::ShareGroup;

    fn state() -> GlClientState {
        GlClientState::new(ShareGroup::new(), HostCaps::default(), (3, 1))
    }

    #[test]
    fn each_vao_keeps_its_own_attribs_and_element_array() {
        let mut s = state();
        s.add_vertex_arrays(&[1]);
        s.bind_buffer(GL_ARRAY_BUFFER, 7).unwrap();
        s.bind_vertex_array(1).unwrap();
        s.set_vertex_attrib_pointer(0, 2, GL_FLOAT, false, 0, false, VertexPointer::Offset(4));
        s.bind_buffer(GL_ELEMENT_ARRAY_BUFFER, 8).unwrap();

        s.bind_vertex_array(0).unwrap();
        assert_eq!(s.bound_buffer(GL_ELEMENT_ARRAY_BUFFER), Some(0));
        assert_eq!(
            s.vertex_attrib_query(0, GL_VERTEX_ATTRIB_ARRAY_BUFFER_BINDING),
            Ok(Some(0))
        );

        s.bind_vertex_array(1).unwrap();
        assert_eq!(s.bound_buffer(GL_ELEMENT_ARRAY_BUFFER), Some(8));
        assert_eq!(
            s.vertex_attrib_query(0, GL_VERTEX_ATTRIB_ARRAY_BUFFER_BINDING),
            Ok(Some(7))
        );
        assert_eq!(s.vertex_binding_query(GL_VERTEX_BINDING_OFFSET, 0), Ok(Some(4)));
        assert_eq!(s.vertex_binding_query(GL_VERTEX_BINDING_STRIDE, 99), Err(GlError::InvalidValue));
    }

    #[test]
    fn unknown_vaos_cannot_be_bound() {
        let mut s = state();
        assert_eq!(s.bind_vertex_array(3), Err(GlError::InvalidOperation));
        s.add_vertex_arrays(&[3]);
        assert!(!s.is_vertex_array(3));
        s.bind_vertex_array(3).unwrap();
        assert!(s.is_vertex_array(3));

        s.delete_vertex_array(3);
        assert_eq!(s.bound_vertex_array(), 0);
        assert_eq!(s.get_integer(GL_VERTEX_ARRAY_BINDING), Some(0));
    }
}
