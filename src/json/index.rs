use super::JsonValue;
use crate::error::JsonError;

/// A position `JsonValue::get` can look up: an array index or an object key
///
/// Sealed; implemented for `usize`, `str`, `String` and references to them.
pub trait JsonIndex: private::Sealed {
    #[doc(hidden)]
    fn lookup<'v>(&self, value: &'v JsonValue) -> Option<&'v JsonValue>;

    /// Breadcrumb segment naming this position
    #[doc(hidden)]
    fn segment(&self) -> String;
}

impl JsonIndex for usize {
    fn lookup<'v>(&self, value: &'v JsonValue) -> Option<&'v JsonValue> {
        match value {
            JsonValue::Array(values) => values.get(*self),
            _ => None,
        }
    }

    fn segment(&self) -> String {
        self.to_string()
    }
}

impl JsonIndex for str {
    fn lookup<'v>(&self, value: &'v JsonValue) -> Option<&'v JsonValue> {
        match value {
            JsonValue::Object(object) => object.get(self),
            _ => None,
        }
    }

    fn segment(&self) -> String {
        self.to_string()
    }
}

impl JsonIndex for String {
    fn lookup<'v>(&self, value: &'v JsonValue) -> Option<&'v JsonValue> {
        self.as_str().lookup(value)
    }

    fn segment(&self) -> String {
        self.clone()
    }
}

impl<T: JsonIndex + ?Sized> JsonIndex for &T {
    fn lookup<'v>(&self, value: &'v JsonValue) -> Option<&'v JsonValue> {
        (**self).lookup(value)
    }

    fn segment(&self) -> String {
        (**self).segment()
    }
}

mod private {
    pub trait Sealed {}
    impl Sealed for usize {}
    impl Sealed for str {}
    impl Sealed for String {}
    impl<T: Sealed + ?Sized> Sealed for &T {}
}

impl JsonValue {
    /// Looks up an array index or object key
    ///
    /// Total: a miss yields `Invalid` with the missed segment as breadcrumb.
    /// Looking up anything on a keypath error appends the segment to its
    /// breadcrumb, so a chain reports where it first went wrong. Init and
    /// parse errors have no breadcrumb and come back unchanged.
    pub fn get<I: JsonIndex>(&self, index: I) -> JsonValue {
        if let JsonValue::Invalid(error) = self {
            return match error.extend(&index.segment()) {
                Some(extended) => JsonValue::Invalid(extended),
                None => self.clone(),
            };
        }

        match index.lookup(self) {
            Some(value) => value.clone(),
            None => JsonValue::Invalid(JsonError::keypath(index.segment())),
        }
    }

    /// Borrowing lookup without breadcrumb tracking
    pub fn lookup<I: JsonIndex>(&self, index: I) -> Option<&JsonValue> {
        index.lookup(self)
    }
}
