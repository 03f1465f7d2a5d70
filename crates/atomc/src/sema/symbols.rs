//! Symbol table: a stack of declared symbols with backward lookup

use super::types::{BaseType, Extent, StructId, Type};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Interned identifier
pub type Name = DefaultSymbol;

/// What a symbol denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolClass {
    Variable,
    Function,
    ExternFunction,
    Struct,
}

/// Where a variable lives. Meaningless for functions and structs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Global,
    Argument,
    Local,
}

/// A declared name
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: Name,
    pub class: SymbolClass,
    pub ty: Type,
    pub storage: Storage,
    /// 0 for globals, otherwise the depth allocated to the enclosing function
    pub depth: u32,
    /// Parameters, in order (functions only)
    pub args: Vec<Symbol>,
    /// Fields, in order (structs only); a namespace of its own
    pub members: Vec<Symbol>,
    /// Line of the declaring identifier
    pub line: u32,
}

impl Symbol {
    pub fn new(name: Name, class: SymbolClass, ty: Type, storage: Storage, depth: u32, line: u32) -> Self {
        Self {
            name,
            class,
            ty,
            storage,
            depth,
            args: Vec::new(),
            members: Vec::new(),
            line,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.class, SymbolClass::Function | SymbolClass::ExternFunction)
    }

    /// Look up a field by name in this struct's member list
    pub fn member(&self, name: Name) -> Option<&Symbol> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// Returned by [`SymbolTable::add`] when a name is already taken at that depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redefinition {
    pub name: String,
    pub previous_line: u32,
}

/// Ordered stack of every symbol declared at global or function scope.
///
/// Lookup scans from the most recent symbol backward, so a later
/// declaration shadows an earlier one until [`SymbolTable::truncate`]
/// removes it.
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    interner: DefaultStringInterner,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            interner: DefaultStringInterner::new(),
        }
    }

    pub fn intern(&mut self, name: &str) -> Name {
        self.interner.get_or_intern(name)
    }

    /// Text of an interned name
    pub fn resolve(&self, name: Name) -> &str {
        self.interner.resolve(name).unwrap_or("<unknown>")
    }

    pub fn name_of(&self, symbol: &Symbol) -> &str {
        self.resolve(symbol.name)
    }

    /// Append `symbol`, rejecting a name already present at the same depth
    pub fn add(&mut self, symbol: Symbol) -> Result<usize, Redefinition> {
        if let Some(prev) = self.find_at_depth(symbol.name, symbol.depth) {
            return Err(Redefinition {
                name: self.resolve(symbol.name).to_string(),
                previous_line: prev.line,
            });
        }
        self.symbols.push(symbol);
        Ok(self.symbols.len() - 1)
    }

    /// Most recent symbol called `name`, at any depth
    pub fn find(&self, name: Name) -> Option<&Symbol> {
        self.position(name).map(|i| &self.symbols[i])
    }

    /// Index of the most recent symbol called `name`
    pub fn position(&self, name: Name) -> Option<usize> {
        self.symbols.iter().rposition(|s| s.name == name)
    }

    pub fn find_at_depth(&self, name: Name, depth: u32) -> Option<&Symbol> {
        self.symbols
            .iter()
            .rev()
            .find(|s| s.name == name && s.depth == depth)
    }

    /// Look up by text without interning a new name
    pub fn find_str(&self, name: &str) -> Option<&Symbol> {
        self.interner.get(name).and_then(|n| self.find(n))
    }

    /// Most recent struct declaration called `name`
    pub fn find_struct(&self, name: Name) -> Option<StructId> {
        self.symbols
            .iter()
            .rposition(|s| s.name == name && s.class == SymbolClass::Struct)
            .map(StructId)
    }

    pub fn find_struct_str(&self, name: &str) -> Option<StructId> {
        self.interner.get(name).and_then(|n| self.find_struct(n))
    }

    /// Interned handle for `name`, if it was ever seen
    pub fn name(&self, name: &str) -> Option<Name> {
        self.interner.get(name)
    }

    pub fn get(&self, index: usize) -> Option<&Symbol> {
        self.symbols.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Symbol> {
        self.symbols.get_mut(index)
    }

    /// Struct declaration referenced by a struct type
    pub fn struct_def(&self, id: StructId) -> Option<&Symbol> {
        self.symbols.get(id.0).filter(|s| s.class == SymbolClass::Struct)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Drop every symbol added after the table had `len` entries
    pub fn truncate(&mut self, len: usize) {
        self.symbols.truncate(len);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Render a type with struct names resolved
    pub fn type_name(&self, ty: &Type) -> String {
        let base = match ty.base {
            BaseType::Struct(id) => match self.struct_def(id) {
                Some(def) => format!("struct {}", self.name_of(def)),
                None => ty.base.to_string(),
            },
            other => other.to_string(),
        };
        match ty.extent {
            Extent::Scalar => base,
            Extent::Open => format!("{}[]", base),
            Extent::Fixed(n) => format!("{}[{}]", base, n),
        }
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.symbols.iter().map(|s| (self.name_of(s), s.class, s.depth)))
            .finish()
    }
}
