//! AtomC types, expression results and the conversion rules between types

use std::fmt;

/// Handle to a struct declaration: its index in the global symbol table.
///
/// Struct symbols are only declared at global scope and scope exit never
/// truncates below a global, so the index stays valid for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StructId(pub usize);

/// Base type of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Int,
    Double,
    Char,
    Struct(StructId),
    Void,
}

/// Scalar or array shape of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extent {
    Scalar,
    /// Array without a declared size (`[]`); parameters and `T*` returns
    Open,
    /// Array with a fixed, positive number of elements
    Fixed(u32),
}

/// A value type: base plus shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Type {
    pub base: BaseType,
    pub extent: Extent,
}

impl Type {
    pub fn new(base: BaseType, extent: Extent) -> Self {
        Self { base, extent }
    }

    pub fn scalar(base: BaseType) -> Self {
        Self::new(base, Extent::Scalar)
    }

    pub fn int() -> Self {
        Self::scalar(BaseType::Int)
    }

    pub fn double() -> Self {
        Self::scalar(BaseType::Double)
    }

    pub fn char() -> Self {
        Self::scalar(BaseType::Char)
    }

    pub fn void() -> Self {
        Self::scalar(BaseType::Void)
    }

    pub fn with_extent(self, extent: Extent) -> Self {
        Self { extent, ..self }
    }

    /// Element type of an array, or the type itself for a scalar
    pub fn element(self) -> Self {
        self.with_extent(Extent::Scalar)
    }

    pub fn is_array(&self) -> bool {
        !matches!(self.extent, Extent::Scalar)
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.base, BaseType::Struct(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self.base, BaseType::Void)
    }

    /// `char`, `int` or `double` scalar
    pub fn is_arithmetic(&self) -> bool {
        !self.is_array() && self.rank().is_some()
    }

    /// Width order for promotion: `char < int < double`
    fn rank(&self) -> Option<u8> {
        match self.base {
            BaseType::Char => Some(0),
            BaseType::Int => Some(1),
            BaseType::Double => Some(2),
            BaseType::Struct(_) | BaseType::Void => None,
        }
    }

    pub fn struct_id(&self) -> Option<StructId> {
        match self.base {
            BaseType::Struct(id) => Some(id),
            _ => None,
        }
    }
}

/// Result type of an arithmetic operator: the wider of two arithmetic scalars.
///
/// Returns `None` when either operand is not an arithmetic scalar.
pub fn promote(a: &Type, b: &Type) -> Option<Type> {
    if !a.is_arithmetic() || !b.is_arithmetic() {
        return None;
    }
    if a.rank() >= b.rank() { Some(a.element()) } else { Some(b.element()) }
}

/// Whether a value of type `src` may be converted to `dst`.
///
/// Used by assignment, explicit casts, initializers, returns and call
/// arguments alike.
pub fn can_cast(dst: &Type, src: &Type) -> bool {
    match (dst.is_array(), src.is_array()) {
        (true, true) => dst.base == src.base,
        (true, false) | (false, true) => false,
        (false, false) => match (dst.base, src.base) {
            (BaseType::Struct(d), BaseType::Struct(s)) => d == s,
            (BaseType::Struct(_), _) | (_, BaseType::Struct(_)) => false,
            (BaseType::Void, _) | (_, BaseType::Void) => false,
            _ => true,
        },
    }
}

/// Compile-time value carried by a constant expression
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Int(i64),
    Real(f64),
    Str(String),
}

/// What an expression evaluates to, as seen by the checker
#[derive(Debug, Clone, PartialEq)]
pub struct ExprInfo {
    pub ty: Type,
    pub lvalue: bool,
    pub constant: Option<ConstValue>,
}

impl ExprInfo {
    /// A non-lvalue, non-constant result
    pub fn rvalue(ty: Type) -> Self {
        Self { ty, lvalue: false, constant: None }
    }

    pub fn lvalue(ty: Type) -> Self {
        Self { ty, lvalue: true, constant: None }
    }

    pub fn constant(ty: Type, value: ConstValue) -> Self {
        Self { ty, lvalue: false, constant: Some(value) }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseType::Int => write!(f, "int"),
            BaseType::Double => write!(f, "double"),
            BaseType::Char => write!(f, "char"),
            BaseType::Struct(id) => write!(f, "struct #{}", id.0),
            BaseType::Void => write!(f, "void"),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.extent {
            Extent::Scalar => write!(f, "{}", self.base),
            Extent::Open => write!(f, "{}[]", self.base),
            Extent::Fixed(n) => write!(f, "{}[{}]", self.base, n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ARITHMETIC: [BaseType; 3] = [BaseType::Char, BaseType::Int, BaseType::Double];

    #[test]
    fn test_promotion_is_symmetric_max() {
        for (i, a) in ARITHMETIC.iter().enumerate() {
            for (j, b) in ARITHMETIC.iter().enumerate() {
                let ta = Type::scalar(*a);
                let tb = Type::scalar(*b);
                let expected = Type::scalar(ARITHMETIC[i.max(j)]);
                assert_eq!(promote(&ta, &tb), Some(expected));
                assert_eq!(promote(&tb, &ta), Some(expected));
            }
        }
    }

    #[test]
    fn test_promotion_rejects_arrays_and_structs() {
        let s = Type::scalar(BaseType::Struct(StructId(3)));
        let arr = Type::new(BaseType::Int, Extent::Fixed(4));
        assert_eq!(promote(&s, &Type::int()), None);
        assert_eq!(promote(&Type::int(), &arr), None);
        assert_eq!(promote(&Type::void(), &Type::int()), None);
    }

    #[test]
    fn test_cast_identity_for_scalars() {
        for base in ARITHMETIC {
            let t = Type::scalar(base);
            assert!(can_cast(&t, &t));
        }
        let s = Type::scalar(BaseType::Struct(StructId(0)));
        assert!(can_cast(&s, &s));
    }

    #[test]
    fn test_cast_between_arithmetic() {
        for a in ARITHMETIC {
            for b in ARITHMETIC {
                assert!(can_cast(&Type::scalar(a), &Type::scalar(b)));
            }
        }
    }

    #[test]
    fn test_cast_arrays() {
        let ints = Type::new(BaseType::Int, Extent::Fixed(5));
        let open_ints = Type::new(BaseType::Int, Extent::Open);
        let chars = Type::new(BaseType::Char, Extent::Fixed(5));
        assert!(can_cast(&ints, &ints));
        assert!(can_cast(&open_ints, &ints));
        assert!(!can_cast(&ints, &chars));
        assert!(!can_cast(&Type::int(), &ints));
        assert!(!can_cast(&ints, &Type::int()));
    }

    #[test]
    fn test_cast_structs_are_nominal() {
        let s = Type::scalar(BaseType::Struct(StructId(1)));
        let r = Type::scalar(BaseType::Struct(StructId(2)));
        assert!(can_cast(&s, &s));
        assert!(!can_cast(&s, &r));
        assert!(!can_cast(&s, &Type::int()));
        assert!(!can_cast(&Type::double(), &r));
    }
}
