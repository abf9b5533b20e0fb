use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, ErrorKind, Result};

/// Maximum number of symbols per day, and of symbols in a palette.
pub const MAX_SYMBOLS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
    /// The set already holds `MAX_SYMBOLS` other symbols; nothing changed.
    Full,
}

/// Symbols applied to a single day, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct SymbolSet(Vec<char>);

impl SymbolSet {
    pub fn toggle(&mut self, symbol: char) -> Toggle {
        if let Some(pos) = self.0.iter().position(|s| *s == symbol) {
            self.0.remove(pos);
            Toggle::Removed
        } else if self.0.len() < MAX_SYMBOLS {
            self.0.push(symbol);
            Toggle::Added
        } else {
            Toggle::Full
        }
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.0.contains(&symbol)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for SymbolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|s| write!(f, "{}", s))
    }
}

impl From<SymbolSet> for String {
    fn from(set: SymbolSet) -> String {
        set.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub glyph: char,
    #[serde(default)]
    pub label: Option<String>,
}

impl Symbol {
    pub fn new(glyph: char) -> Self {
        Symbol { glyph, label: None }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_owned());
        self
    }

    fn legend_label(&self) -> Option<&str> {
        self.label.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Symbol::new('●')
    }
}

/// The symbols a user can apply, and which one is currently active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    symbols: Vec<Symbol>,
    active: Option<usize>,
}

impl Palette {
    pub fn new(symbols: Vec<Symbol>) -> Result<Self> {
        if symbols.len() > MAX_SYMBOLS {
            return Err(Error::new(
                ErrorKind::TooManySymbols,
                &format!("got {}", symbols.len()),
            ));
        }

        for (i, symbol) in symbols.iter().enumerate() {
            if symbol.glyph.is_whitespace() || symbol.glyph.is_control() {
                return Err(Error::new(
                    ErrorKind::SymbolParse,
                    &format!("{:?} is not a visible character", symbol.glyph),
                ));
            }
            if symbols[..i].iter().any(|s| s.glyph == symbol.glyph) {
                return Err(Error::new(
                    ErrorKind::DuplicateSymbol,
                    &symbol.glyph.to_string(),
                ));
            }
        }

        // The first symbol starts out active
        let active = if symbols.is_empty() { None } else { Some(0) };

        Ok(Palette { symbols, active })
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn active(&self) -> Option<char> {
        self.active.map(|idx| self.symbols[idx].glyph)
    }

    pub fn activate(&mut self, glyph: char) -> Result<()> {
        let idx = self
            .symbols
            .iter()
            .position(|s| s.glyph == glyph)
            .ok_or_else(|| Error::new(ErrorKind::UnknownSymbol, &glyph.to_string()))?;
        self.active = Some(idx);
        Ok(())
    }

    /// Symbols that carry a non-empty label, in palette order.
    pub fn legend(&self) -> impl Iterator<Item = (char, &str)> {
        self.symbols
            .iter()
            .filter_map(|s| s.legend_label().map(|label| (s.glyph, label)))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            symbols: vec![Symbol::default()],
            active: Some(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(symbols: &str) -> SymbolSet {
        let mut set = SymbolSet::default();
        symbols.chars().for_each(|s| {
            set.toggle(s);
        });
        set
    }

    #[test]
    fn toggle_appends_in_order() {
        let mut set = SymbolSet::default();
        assert_eq!(set.toggle('A'), Toggle::Added);
        assert_eq!(set.toggle('B'), Toggle::Added);
        assert_eq!(set.to_string(), "AB");
    }

    #[test]
    fn toggle_removes_and_keeps_order() {
        let mut set = set_of("ABC");
        assert_eq!(set.toggle('B'), Toggle::Removed);
        assert_eq!(set.to_string(), "AC");
    }

    #[test]
    fn toggle_twice_restores_previous_state() {
        let before = set_of("●✕");
        let mut set = before.clone();
        set.toggle('△');
        set.toggle('△');
        assert_eq!(set, before);

        set.toggle('●');
        set.toggle('●');
        // Re-adding moves the symbol to the back
        assert_eq!(set.to_string(), "✕●");
    }

    #[test]
    fn fifth_symbol_is_ignored() {
        let mut set = set_of("ABCD");
        assert_eq!(set.toggle('E'), Toggle::Full);
        assert_eq!(set.to_string(), "ABCD");
        assert_eq!(set.len(), MAX_SYMBOLS);

        assert_eq!(set.toggle('A'), Toggle::Removed);
        assert_eq!(set.toggle('E'), Toggle::Added);
        assert_eq!(set.to_string(), "BCDE");
    }

    #[test]
    fn palette_limits() {
        let five = "ABCDE".chars().map(Symbol::new).collect();
        assert!(matches!(
            Palette::new(five).unwrap_err().kind,
            ErrorKind::TooManySymbols
        ));

        let dup = vec![Symbol::new('A'), Symbol::new('A')];
        assert!(matches!(
            Palette::new(dup).unwrap_err().kind,
            ErrorKind::DuplicateSymbol
        ));

        assert!(matches!(
            Palette::new(vec![Symbol::new(' ')]).unwrap_err().kind,
            ErrorKind::SymbolParse
        ));
    }

    #[test]
    fn first_symbol_is_active() {
        let mut palette = Palette::new(vec![Symbol::new('○'), Symbol::new('×')]).unwrap();
        assert_eq!(palette.active(), Some('○'));
        palette.activate('×').unwrap();
        assert_eq!(palette.active(), Some('×'));
        assert!(palette.activate('?').is_err());
        assert_eq!(palette.active(), Some('×'));

        assert_eq!(Palette::new(Vec::new()).unwrap().active(), None);
    }

    #[test]
    fn legend_skips_unlabelled() {
        let palette = Palette::new(vec![
            Symbol::new('○').with_label("office"),
            Symbol::new('×'),
            Symbol::new('△').with_label("  "),
            Symbol::new('◎').with_label("remote"),
        ])
        .unwrap();
        let legend: Vec<_> = palette.legend().collect();
        assert_eq!(legend, vec![('○', "office"), ('◎', "remote")]);
    }
}
