//! Predefined external functions available to every program

use super::symbols::{Redefinition, Storage, Symbol, SymbolClass, SymbolTable};
use super::types::{BaseType, Extent, Type};

/// (name, return type, parameters)
type ExternSignature = (&'static str, Type, &'static [(&'static str, Type)]);

const CHAR_ARRAY: Type = Type { base: BaseType::Char, extent: Extent::Open };
const INT: Type = Type { base: BaseType::Int, extent: Extent::Scalar };
const DOUBLE: Type = Type { base: BaseType::Double, extent: Extent::Scalar };
const CHAR: Type = Type { base: BaseType::Char, extent: Extent::Scalar };
const VOID: Type = Type { base: BaseType::Void, extent: Extent::Scalar };

pub const EXTERNS: &[ExternSignature] = &[
    ("put_s", VOID, &[("s", CHAR_ARRAY)]),
    ("get_s", VOID, &[("s", CHAR_ARRAY)]),
    ("put_i", VOID, &[("i", INT)]),
    ("get_i", INT, &[]),
    ("put_d", VOID, &[("d", DOUBLE)]),
    ("get_d", DOUBLE, &[]),
    ("put_c", VOID, &[("c", CHAR)]),
    ("get_c", CHAR, &[]),
    ("seconds", DOUBLE, &[]),
];

/// Register every external function at global depth.
///
/// Fails if one of the names is already declared globally in `table`.
pub fn register_externs(table: &mut SymbolTable) -> Result<(), Redefinition> {
    for (name, ret, params) in EXTERNS {
        let name = table.intern(name);
        let mut func = Symbol::new(name, SymbolClass::ExternFunction, *ret, Storage::Global, 0, 0);
        for (arg_name, arg_ty) in params.iter() {
            let arg_name = table.intern(arg_name);
            func.args
                .push(Symbol::new(arg_name, SymbolClass::Variable, *arg_ty, Storage::Argument, 1, 0));
        }
        table.add(func)?;
    }
    Ok(())
}
