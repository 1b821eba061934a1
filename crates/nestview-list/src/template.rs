use std::collections::HashMap;
use std::fmt;

use nestview_core::{ListError, ListResult, Vec3};

/// What kind of row a template produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowRole {
    /// Object/component header carrying the panel lock toggle.
    Header,
    /// Numeric editor; also used for array-size fields.
    Number,
    /// Everything else (text, bool, vector, generic rows).
    Plain,
}

/// A registered row template: its role and a way to measure a prototype.
pub struct Template {
    role: RowRole,
    measure: Box<dyn Fn() -> Vec3>,
}

impl Template {
    /// Template whose footprint is known up front.
    pub fn fixed(role: RowRole, size: Vec3) -> Self {
        Self {
            role,
            measure: Box::new(move || size),
        }
    }

    /// Template measured from a prototype instance the first time it is needed.
    pub fn measured(role: RowRole, measure: impl Fn() -> Vec3 + 'static) -> Self {
        Self {
            role,
            measure: Box::new(measure),
        }
    }

    pub fn role(&self) -> RowRole {
        self.role
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template").field("role", &self.role).finish()
    }
}

/// Template kind -> footprint, measured once per kind and never invalidated.
#[derive(Debug, Default)]
pub struct TemplateCache {
    templates: HashMap<String, Template>,
    sizes: HashMap<String, Vec3>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: impl Into<String>, template: Template) -> ListResult<()> {
        let kind = kind.into();
        if self.templates.contains_key(&kind) {
            return Err(ListError::DuplicateTemplate(kind));
        }
        self.templates.insert(kind, template);
        Ok(())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.templates.contains_key(kind)
    }

    pub fn role(&self, kind: &str) -> Option<RowRole> {
        self.templates.get(kind).map(Template::role)
    }

    pub fn size_of(&mut self, kind: &str) -> ListResult<Vec3> {
        if let Some(size) = self.sizes.get(kind) {
            return Ok(*size);
        }
        let template = self
            .templates
            .get(kind)
            .ok_or_else(|| ListError::UnknownTemplate(kind.to_string()))?;
        let size = (template.measure)();
        log::debug!("measured template `{kind}`: {size:?}");
        self.sizes.insert(kind.to_string(), size);
        Ok(size)
    }

    /// Number of kinds measured so far.
    pub fn measured(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_size_is_measured_once() {
        let calls = Rc::new(Cell::new(0));
        let mut cache = TemplateCache::new();
        let c = calls.clone();
        cache
            .register(
                "number",
                Template::measured(RowRole::Number, move || {
                    c.set(c.get() + 1);
                    Vec3::new(0.3, 0.02, 0.04)
                }),
            )
            .unwrap();

        assert_eq!(cache.measured(), 0);
        let a = cache.size_of("number").unwrap();
        let b = cache.size_of("number").unwrap();
        assert_eq!(a, b);
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.measured(), 1);
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        let mut cache = TemplateCache::new();
        assert_eq!(
            cache.size_of("missing"),
            Err(ListError::UnknownTemplate("missing".into()))
        );
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut cache = TemplateCache::new();
        cache.register("h", Template::fixed(RowRole::Header, Vec3::ONE)).unwrap();
        assert_eq!(
            cache.register("h", Template::fixed(RowRole::Plain, Vec3::ONE)),
            Err(ListError::DuplicateTemplate("h".into()))
        );
        assert_eq!(cache.role("h"), Some(RowRole::Header));
    }
}
