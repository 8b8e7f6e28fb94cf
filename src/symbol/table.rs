use crate::lexer::Keyword;
use crate::symbol::SymbolError;
use crate::types::TypeId;

pub const DEFAULT_MAX_SYMBOLS: usize = 512;
pub const DEFAULT_NAME_BUFFER_SIZE: usize = 8 * 1024;

/// What a symbol-table entry denotes.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    Reserved(Keyword),
    /// The module being compiled.
    ThisModule,
    /// An imported module.
    Import,
    /// `Alias := Module` in an import list; holds the index of the real import.
    Alias(usize),
    Constant,
    Procedure {
        exported: bool,
        params: Vec<TypeId>,
    },
    /// Module-level variable, or a procedure local.
    Variable { exported: bool },
    Parameter,
}

/// Symbol information. The name lives in the table's interned buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    name_start: usize,
    name_len: usize,
    pub kind: SymbolKind,
    pub data_type: TypeId,
}

/// Saved table lengths; handing it back to [`SymbolTable::release`] drops
/// every entry added since it was taken.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a scope mark must be released"]
pub struct Mark {
    entries: usize,
    names: usize,
}

impl Mark {
    /// Index the first entry of the marked scope will get.
    pub fn first_entry(&self) -> usize {
        self.entries
    }
}

/// Append-only symbol log with an interned name buffer. Lookup walks from the
/// newest entry backwards, so inner declarations hide outer ones.
#[derive(Debug)]
pub struct SymbolTable {
    entries: Vec<Symbol>,
    names: String,
    max_entries: usize,
    name_capacity: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SYMBOLS, DEFAULT_NAME_BUFFER_SIZE)
    }
}

impl SymbolTable {
    #[must_use]
    pub fn new(max_entries: usize, name_capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            names: String::new(),
            max_entries,
            name_capacity,
        }
    }

    /// A table holding nothing but the reserved words, with no capacity limit.
    #[must_use]
    pub fn reserved_words() -> Self {
        let mut table = Self::new(usize::MAX, usize::MAX);
        for keyword in Keyword::ALL {
            table.push(keyword.as_str(), SymbolKind::Reserved(keyword), TypeId::of_keyword(keyword));
        }
        table
    }

    /// Seed the reserved words. Called once at the start of every module.
    /// # Errors
    /// If the configured capacities cannot even hold the reserved words
    pub fn seed_reserved_words(&mut self) -> Result<(), SymbolError> {
        for keyword in Keyword::ALL {
            self.add(keyword.as_str(), SymbolKind::Reserved(keyword), TypeId::of_keyword(keyword))?;
        }
        Ok(())
    }

    /// Append an entry and return its index.
    /// # Errors
    /// If either the entry capacity or the name buffer is exhausted
    pub fn add(&mut self, name: &str, kind: SymbolKind, data_type: TypeId) -> Result<usize, SymbolError> {
        if self.entries.len() >= self.max_entries {
            return Err(SymbolError::TableFull);
        }
        if self.names.len().saturating_add(name.len()) >= self.name_capacity {
            return Err(SymbolError::NameBufferFull);
        }
        Ok(self.push(name, kind, data_type))
    }

    fn push(&mut self, name: &str, kind: SymbolKind, data_type: TypeId) -> usize {
        let name_start = self.names.len();
        self.names.push_str(name);
        self.entries.push(Symbol {
            name_start,
            name_len: name.len(),
            kind,
            data_type,
        });
        self.entries.len() - 1
    }

    /// Look up a name, innermost declaration first.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<usize> {
        (0..self.entries.len()).rev().find(|&index| self.name(index) == name)
    }

    /// # Panics
    /// If `index` is not a live entry
    #[must_use]
    pub fn get(&self, index: usize) -> &Symbol {
        &self.entries[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut Symbol {
        &mut self.entries[index]
    }

    #[must_use]
    pub fn name(&self, index: usize) -> &str {
        let entry = &self.entries[index];
        &self.names[entry.name_start..entry.name_start + entry.name_len]
    }

    /// Follow an import alias to the module it stands for. Anything else
    /// resolves to itself.
    #[must_use]
    pub fn resolve_alias(&self, index: usize) -> usize {
        match self.entries[index].kind {
            SymbolKind::Alias(target) => target,
            _ => index,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes used in the name buffer.
    #[must_use]
    pub fn name_buffer_len(&self) -> usize {
        self.names.len()
    }

    pub fn mark(&self) -> Mark {
        Mark {
            entries: self.entries.len(),
            names: self.names.len(),
        }
    }

    /// Truncate back to `mark`, discarding everything declared after it.
    pub fn release(&mut self, mark: Mark) {
        let dropped = self.entries.len().saturating_sub(mark.entries);
        self.entries.truncate(mark.entries);
        self.names.truncate(mark.names);
        tracing::trace!(dropped, remaining = self.entries.len(), "released scope");
    }
}
