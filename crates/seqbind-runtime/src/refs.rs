//! Cross-runtime object handles.

use std::fmt;

/// Which runtime owns the object behind a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    HostOwned,
    ForeignOwned,
}

/// Opaque identity of an object living in one of the two runtimes.
///
/// On the wire a handle is a single signed 32-bit number: negative numbers
/// name host-owned objects, everything else names foreign-owned ones. That
/// convention is decoded once, in [`Ref::from_wire`]; everything else matches
/// on the variant. The wrapped number is the wire number unchanged.
///
/// Handles are never allocated or released here; the transport owns their
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ref {
    HostOwned(i32),
    ForeignOwned(i32),
}

impl Ref {
    pub fn from_wire(num: i32) -> Self {
        if num < 0 {
            Ref::HostOwned(num)
        } else {
            Ref::ForeignOwned(num)
        }
    }

    pub fn to_wire(self) -> i32 {
        match self {
            Ref::HostOwned(num) | Ref::ForeignOwned(num) => num,
        }
    }

    pub fn owner(self) -> Owner {
        match self {
            Ref::HostOwned(_) => Owner::HostOwned,
            Ref::ForeignOwned(_) => Owner::ForeignOwned,
        }
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ref::HostOwned(num) => write!(f, "host#{}", num),
            Ref::ForeignOwned(num) => write!(f, "foreign#{}", num),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_convention() {
        assert_eq!(Ref::from_wire(-7), Ref::HostOwned(-7));
        assert_eq!(Ref::from_wire(0).owner(), Owner::ForeignOwned);
        assert_eq!(Ref::from_wire(42), Ref::ForeignOwned(42));
    }

    #[test]
    fn test_wire_number_is_preserved() {
        for num in [i32::MIN, -1, 0, 1, i32::MAX] {
            assert_eq!(Ref::from_wire(num).to_wire(), num);
        }
    }
}
