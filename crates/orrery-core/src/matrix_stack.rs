//! Hierarchical transform stack
//!
//! Child transforms are built by pushing a copy of the parent, multiplying
//! local transforms onto it, and popping back when the child is finished.

use crate::math::{self, Mat4};
use crate::{OrreryError, Result, Vec3};

/// A LIFO of matrices whose top is the current transform.
///
/// The stack always holds at least its base matrix; `pop` refuses to remove it.
#[derive(Debug, Clone)]
pub struct MatrixStack {
    stack: Vec<Mat4>,
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixStack {
    pub fn new() -> Self {
        Self::with_base(math::IDENTITY)
    }

    pub fn with_base(base: Mat4) -> Self {
        Self { stack: vec![base] }
    }

    /// Duplicate the current top
    pub fn push(&mut self) {
        let top = *self.top();
        self.stack.push(top);
    }

    /// Remove and return the current top
    pub fn pop(&mut self) -> Result<Mat4> {
        if self.stack.len() <= 1 {
            return Err(OrreryError::RenderError("matrix stack underflow".into()));
        }
        self.stack
            .pop()
            .ok_or_else(|| OrreryError::RenderError("matrix stack underflow".into()))
    }

    pub fn top(&self) -> &Mat4 {
        // The base entry is never popped
        &self.stack[self.stack.len() - 1]
    }

    /// Number of entries, including the base
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Replace the top
    pub fn load(&mut self, m: Mat4) {
        let last = self.stack.len() - 1;
        self.stack[last] = m;
    }

    /// Right-multiply the top by `m`
    pub fn mult(&mut self, m: &Mat4) {
        let top = math::mul(self.top(), m);
        self.load(top);
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.mult(&math::translation(Vec3::new(x, y, z)));
    }

    pub fn rotate(&mut self, degrees: f32, axis: Vec3) {
        self.mult(&math::rotation_axis(degrees, axis));
    }

    pub fn rotate_x(&mut self, degrees: f32) {
        self.mult(&math::rotation_x(degrees));
    }

    pub fn rotate_y(&mut self, degrees: f32) {
        self.mult(&math::rotation_y(degrees));
    }

    pub fn rotate_z(&mut self, degrees: f32) {
        self.mult(&math::rotation_z(degrees));
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.mult(&math::scaling(Vec3::new(x, y, z)));
    }
}
