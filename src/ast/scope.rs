use std::collections::HashMap;

/// Source of variable values during evaluation.
pub trait Scope {
    fn get_var(&self, name: &str) -> Option<f64>;
}

impl Scope for HashMap<String, f64> {
    fn get_var(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl<T: Scope + ?Sized> Scope for &T {
    fn get_var(&self, name: &str) -> Option<f64> {
        (**self).get_var(name)
    }
}

/// A base scope with one variable replaced, without copying or touching the base.
///
/// The sampler builds one of these per step to pin the independent variable.
#[derive(Debug)]
pub struct Override<'a, S: ?Sized> {
    base: &'a S,
    name: &'a str,
    value: f64,
}

impl<'a, S: Scope + ?Sized> Override<'a, S> {
    pub fn new(base: &'a S, name: &'a str, value: f64) -> Self {
        Self { base, name, value }
    }
}

impl<S: Scope + ?Sized> Scope for Override<'_, S> {
    fn get_var(&self, name: &str) -> Option<f64> {
        if name == self.name {
            Some(self.value)
        } else {
            self.base.get_var(name)
        }
    }
}
