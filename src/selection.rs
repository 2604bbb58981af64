//! Transformation selection for a character card or detail view.

use crate::types::{Character, Transformation};

/// Which form of a character is on display.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Form {
    /// The character's own name, image and ki.
    #[default]
    Base,
    /// Index into `Character::transformations`.
    Variant(usize),
}

impl Form {
    pub fn can_prev(self) -> bool {
        !matches!(self, Form::Base)
    }

    pub fn can_next(self, len: usize) -> bool {
        match self {
            Form::Base => len > 0,
            Form::Variant(i) => i + 1 < len,
        }
    }

    /// One step toward `Base`; no-op at the lower bound.
    pub fn prev(self) -> Form {
        match self {
            Form::Base | Form::Variant(0) => Form::Base,
            Form::Variant(i) => Form::Variant(i - 1),
        }
    }

    /// One step toward the last transformation; no-op at the upper bound.
    pub fn next(self, len: usize) -> Form {
        if !self.can_next(len) {
            return self.clamp(len);
        }
        match self {
            Form::Base => Form::Variant(0),
            Form::Variant(i) => Form::Variant(i + 1),
        }
    }

    /// Pull a stale selection back inside `len` transformations.
    pub fn clamp(self, len: usize) -> Form {
        match self {
            Form::Variant(_) if len == 0 => Form::Base,
            Form::Variant(i) if i >= len => Form::Variant(len - 1),
            other => other,
        }
    }

    /// Legacy integer view: `Base` is -1.
    pub fn index(self) -> i64 {
        match self {
            Form::Base => -1,
            Form::Variant(i) => i as i64,
        }
    }
}

/// The fields that change with the selected form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shown<'a> {
    pub name: &'a str,
    pub image: &'a str,
    pub ki: &'a str,
    pub transformation: Option<&'a Transformation>,
}

/// Resolve name, image and ki for `form`. Empty transformation fields fall
/// back to the base character's value.
pub fn shown(c: &Character, form: Form) -> Shown<'_> {
    let t = match form.clamp(c.transformations.len()) {
        Form::Base => None,
        Form::Variant(i) => c.transformations.get(i),
    };
    match t {
        None => Shown {
            name: &c.name,
            image: &c.image,
            ki: &c.ki,
            transformation: None,
        },
        Some(t) => Shown {
            name: or_base(&t.name, &c.name),
            image: or_base(&t.image, &c.image),
            ki: or_base(&t.ki, &c.ki),
            transformation: Some(t),
        },
    }
}

fn or_base<'a>(variant: &'a str, base: &'a str) -> &'a str {
    if variant.trim().is_empty() {
        base
    } else {
        variant
    }
}
