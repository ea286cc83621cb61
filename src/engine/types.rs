// src/engine/types.rs
use std::collections::HashMap;

/// Direction in which an item counts toward a scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    /// Tie-break order used when flattening a scale: '+' items before '-' items.
    pub const ORDER: [Sign; 2] = [Sign::Plus, Sign::Minus];

    /// "+" or "-" (surrounding whitespace ignored).
    pub fn parse(s: &str) -> Option<Sign> {
        match s.trim() {
            "+" => Some(Sign::Plus),
            "-" => Some(Sign::Minus),
            _ => None,
        }
    }

    pub fn value(self) -> i8 {
        match self { Sign::Plus => 1, Sign::Minus => -1 }
    }
}

/// A named sub-score with its forward- and reverse-keyed items, in page order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scale {
    pub name: String,
    plus: Vec<String>,
    minus: Vec<String>,
}

impl Scale {
    pub fn new(name: &str) -> Self {
        Self { name: s!(name), plus: Vec::new(), minus: Vec::new() }
    }

    pub fn items(&self, sign: Sign) -> &[String] {
        match sign { Sign::Plus => &self.plus, Sign::Minus => &self.minus }
    }

    pub fn push(&mut self, sign: Sign, item: String) {
        match sign {
            Sign::Plus => self.plus.push(item),
            Sign::Minus => self.minus.push(item),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.plus.is_empty() && self.minus.is_empty()
    }
}

/// Scales in the order their titles were first seen.
#[derive(Clone, Debug, Default)]
pub struct Scales {
    list: Vec<Scale>,
    by_name: HashMap<String, usize>,
}

impl Scales {
    /// Start collecting `name`. Re-opening a known title empties it but keeps its position.
    pub fn open(&mut self, name: &str) {
        match self.by_name.get(name) {
            Some(&i) => self.list[i] = Scale::new(name),
            None => {
                self.by_name.insert(s!(name), self.list.len());
                self.list.push(Scale::new(name));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Scale> {
        self.by_name.get(name).map(|&i| &self.list[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Scale> {
        self.by_name.get(name).map(|&i| &mut self.list[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scale> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

/// Dense items x scales matrix of -1/0/+1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoringKey {
    /// Row labels, in first-occurrence order.
    pub items: Vec<String>,
    /// Column labels: scales that kept at least one item.
    pub scales: Vec<String>,
    /// `values[row][col]`
    pub values: Vec<Vec<i8>>,
}

impl ScoringKey {
    pub fn value(&self, item: &str, scale: &str) -> Option<i8> {
        let r = self.items.iter().position(|i| i == item)?;
        let c = self.scales.iter().position(|s| s == scale)?;
        Some(self.values[r][c])
    }

    pub fn rows(&self) -> usize {
        self.items.len()
    }
}
