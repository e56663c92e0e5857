//! Engine de notación de línea incluido en el crate.
//!
//! Implementa `StructureEngine` sobre una notación tipo SMILES muy
//! simplificada: átomos del subconjunto orgánico, átomos entre corchetes
//! (isótopo, estéreo, H explícito, carga), anillos, ramas y fragmentos
//! separados por punto. La química real queda fuera: alcanza con que la
//! canonicalización sea determinista y las operaciones sean reproducibles.
//!
//! La forma canónica simplifica corchetes redundantes ([CH] -> C) y ordena
//! los fragmentos lexicográficamente, de modo que "igual contenido" implique
//! "igual texto" e "igual fingerprint".

use super::{EngineError, Structure, StructureEngine};

const ORGANIC_SUBSET: &[&str] = &["B", "C", "N", "O", "P", "S", "F", "Cl", "Br", "I"];
const AROMATIC: &[char] = &['b', 'c', 'n', 'o', 'p', 's'];
/// Conjunto permitido por el filtro de inorgánicos (espejo del patrón
/// NON_ORGANIC del pipeline original).
const ORGANIC_ALLOWED: &[&str] = &[
    "H", "B", "C", "N", "O", "P", "S", "F", "Cl", "Br", "I", "Na", "K", "Mg", "Ca", "Li",
];

fn atomic_mass(symbol: &str) -> Option<f64> {
    Some(match symbol {
        "H" => 1.008,
        "Li" => 6.94,
        "B" => 10.811,
        "C" => 12.011,
        "N" => 14.007,
        "O" => 15.999,
        "F" => 18.998,
        "Na" => 22.990,
        "Mg" => 24.305,
        "P" => 30.974,
        "S" => 32.06,
        "Cl" => 35.453,
        "K" => 39.098,
        "Ca" => 40.078,
        "Br" => 79.904,
        "I" => 126.904,
        _ => return None,
    })
}

#[derive(Debug, Clone, PartialEq)]
struct BracketAtom {
    isotope: Option<u32>,
    symbol: String,
    aromatic: bool,
    stereo: u8,
    hcount: u32,
    charge: i32,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Bracket(BracketAtom),
    Bare { symbol: String, aromatic: bool },
    Bond(char),
    Ring(String),
    Open,
    Close,
    Dot,
}

fn parse_error(raw: &str) -> EngineError {
    EngineError::Parse(raw.to_string())
}

fn parse_bracket(content: &str, raw: &str) -> Result<BracketAtom, EngineError> {
    let chars: Vec<char> = content.chars().collect();
    let mut i = 0;

    let mut isotope_digits = String::new();
    while i < chars.len() && chars[i].is_ascii_digit() {
        isotope_digits.push(chars[i]);
        i += 1;
    }
    let isotope = if isotope_digits.is_empty() {
        None
    } else {
        Some(isotope_digits.parse().map_err(|_| parse_error(raw))?)
    };

    let (symbol, aromatic) = match chars.get(i) {
        Some(c) if c.is_ascii_uppercase() => {
            let mut sym = c.to_string();
            i += 1;
            if let Some(low) = chars.get(i).filter(|c| c.is_ascii_lowercase()) {
                sym.push(*low);
                i += 1;
            }
            (sym, false)
        }
        Some(c) if AROMATIC.contains(c) => {
            let sym = c.to_ascii_uppercase().to_string();
            i += 1;
            (sym, true)
        }
        _ => return Err(parse_error(raw)),
    };

    let mut atom = BracketAtom { isotope, symbol, aromatic, stereo: 0, hcount: 0, charge: 0 };

    while i < chars.len() {
        match chars[i] {
            '@' => {
                atom.stereo += 1;
                i += 1;
            }
            'H' => {
                i += 1;
                let mut digits = String::new();
                while i < chars.len() && chars[i].is_ascii_digit() {
                    digits.push(chars[i]);
                    i += 1;
                }
                atom.hcount = if digits.is_empty() {
                    1
                } else {
                    digits.parse().map_err(|_| parse_error(raw))?
                };
            }
            sign @ ('+' | '-') => {
                let mut count = 0i32;
                while i < chars.len() && chars[i] == sign {
                    count += 1;
                    i += 1;
                }
                let mut digits = String::new();
                while i < chars.len() && chars[i].is_ascii_digit() {
                    digits.push(chars[i]);
                    i += 1;
                }
                let magnitude: i32 = if digits.is_empty() {
                    count
                } else {
                    digits.parse().map_err(|_| parse_error(raw))?
                };
                atom.charge = if sign == '+' { magnitude } else { -magnitude };
            }
            _ => return Err(parse_error(raw)),
        }
    }

    Ok(atom)
}

fn tokenize(raw: &str) -> Result<Vec<Token>, EngineError> {
    let chars: Vec<char> = raw.chars().collect();
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '[' => {
                let close = chars[i + 1..]
                    .iter()
                    .position(|&c| c == ']')
                    .ok_or_else(|| parse_error(raw))?;
                let content: String = chars[i + 1..i + 1 + close].iter().collect();
                tokens.push(Token::Bracket(parse_bracket(&content, raw)?));
                i += close + 2;
            }
            ']' => return Err(parse_error(raw)),
            '(' => {
                depth += 1;
                tokens.push(Token::Open);
                i += 1;
            }
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| parse_error(raw))?;
                tokens.push(Token::Close);
                i += 1;
            }
            '.' => {
                if depth != 0 {
                    return Err(parse_error(raw));
                }
                tokens.push(Token::Dot);
                i += 1;
            }
            '%' => {
                let digits: String = chars[i + 1..].iter().take(2).collect();
                if digits.len() != 2 || !digits.chars().all(|c| c.is_ascii_digit()) {
                    return Err(parse_error(raw));
                }
                tokens.push(Token::Ring(format!("%{digits}")));
                i += 3;
            }
            '0'..='9' => {
                tokens.push(Token::Ring(c.to_string()));
                i += 1;
            }
            '-' | '=' | '#' | ':' | '/' | '\\' | '~' => {
                tokens.push(Token::Bond(c));
                i += 1;
            }
            c if c.is_ascii_uppercase() => {
                let mut symbol = c.to_string();
                if let Some(low) = chars.get(i + 1).filter(|c| c.is_ascii_lowercase()) {
                    let pair = format!("{c}{low}");
                    if pair == "Cl" || pair == "Br" {
                        symbol = pair;
                    }
                }
                if symbol.len() == 2 {
                    i += 2;
                } else {
                    if !ORGANIC_SUBSET.contains(&symbol.as_str()) {
                        return Err(parse_error(raw));
                    }
                    i += 1;
                }
                tokens.push(Token::Bare { symbol, aromatic: false });
            }
            c if AROMATIC.contains(&c) => {
                tokens.push(Token::Bare { symbol: c.to_ascii_uppercase().to_string(), aromatic: true });
                i += 1;
            }
            _ => return Err(parse_error(raw)),
        }
    }

    if depth != 0 {
        return Err(parse_error(raw));
    }
    Ok(tokens)
}

/// Un corchete es redundante cuando no aporta nada que la forma desnuda no
/// exprese: sin isótopo, sin estéreo, sin carga y símbolo del subconjunto
/// orgánico (el conteo de H pasa a ser implícito).
fn render_atom(atom: &BracketAtom) -> String {
    let reducible = atom.isotope.is_none() && atom.stereo == 0 && atom.charge == 0;
    if reducible && atom.aromatic && atom.symbol.len() == 1 {
        return atom.symbol.to_ascii_lowercase();
    }
    if reducible && !atom.aromatic && ORGANIC_SUBSET.contains(&atom.symbol.as_str()) {
        return atom.symbol.clone();
    }

    let mut out = String::from("[");
    if let Some(iso) = atom.isotope {
        out.push_str(&iso.to_string());
    }
    if atom.aromatic {
        out.push_str(&atom.symbol.to_ascii_lowercase());
    } else {
        out.push_str(&atom.symbol);
    }
    for _ in 0..atom.stereo {
        out.push('@');
    }
    match atom.hcount {
        0 => {}
        1 => out.push('H'),
        n => out.push_str(&format!("H{n}")),
    }
    match atom.charge {
        0 => {}
        1 => out.push('+'),
        -1 => out.push('-'),
        n if n > 0 => out.push_str(&format!("+{n}")),
        n => out.push_str(&format!("-{}", -n)),
    }
    out.push(']');
    out
}

fn render_fragment(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Bracket(atom) => out.push_str(&render_atom(atom)),
            Token::Bare { symbol, aromatic } => {
                if *aromatic {
                    out.push_str(&symbol.to_ascii_lowercase());
                } else {
                    out.push_str(symbol);
                }
            }
            Token::Bond(c) => out.push(*c),
            Token::Ring(r) => out.push_str(r),
            Token::Open => out.push('('),
            Token::Close => out.push(')'),
            Token::Dot => {}
        }
    }
    out
}

fn split_fragments(tokens: &[Token]) -> Vec<Vec<Token>> {
    let mut fragments = vec![Vec::new()];
    for token in tokens {
        if matches!(token, Token::Dot) {
            fragments.push(Vec::new());
        } else {
            fragments.last_mut().expect("at least one fragment").push(token.clone());
        }
    }
    fragments.retain(|f| f.iter().any(|t| matches!(t, Token::Bracket(_) | Token::Bare { .. })));
    fragments
}

/// Forma canónica: corchetes simplificados y fragmentos ordenados.
fn canonical_text(tokens: &[Token]) -> String {
    let mut rendered: Vec<String> = split_fragments(tokens).iter().map(|f| render_fragment(f)).collect();
    rendered.sort();
    rendered.join(".")
}

/// Pares (símbolo, cantidad) de todos los átomos, incluyendo H explícitos.
fn element_counts(tokens: &[Token]) -> Vec<(String, u32)> {
    let mut counts = Vec::new();
    for token in tokens {
        match token {
            Token::Bare { symbol, .. } => counts.push((symbol.clone(), 1)),
            Token::Bracket(atom) => {
                counts.push((atom.symbol.clone(), 1));
                if atom.hcount > 0 {
                    counts.push(("H".to_string(), atom.hcount));
                }
            }
            _ => {}
        }
    }
    counts
}

fn heavy_atom_count(tokens: &[Token]) -> usize {
    tokens
        .iter()
        .filter(|t| match t {
            Token::Bare { .. } => true,
            Token::Bracket(atom) => atom.symbol != "H",
            _ => false,
        })
        .count()
}

fn is_explicit_h(token: &Token) -> bool {
    matches!(
        token,
        Token::Bracket(BracketAtom { symbol, isotope: None, charge: 0, hcount: 0, .. })
            if symbol == "H"
    )
}

/// Engine de referencia del crate. Sin estado; puede compartirse entre
/// workflows.
#[derive(Debug, Default, Clone)]
pub struct TextEngine;

impl TextEngine {
    pub fn new() -> Self {
        Self
    }

    fn tokens(&self, structure: &Structure) -> Result<Vec<Token>, EngineError> {
        tokenize(structure.as_text())
    }

    fn rebuild(&self, tokens: &[Token], op: &'static str) -> Result<Structure, EngineError> {
        let canonical = canonical_text(tokens);
        if canonical.is_empty() {
            return Err(EngineError::Operation { op, reason: "result has no atoms".into() });
        }
        Ok(Structure::from_canonical(canonical))
    }
}

impl StructureEngine for TextEngine {
    fn name(&self) -> &str {
        "text-notation"
    }

    fn version(&self) -> &str {
        "0.1.0"
    }

    fn parse(&self, raw: &str) -> Result<Structure, EngineError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(parse_error(raw));
        }
        let tokens = tokenize(trimmed)?;
        if element_counts(&tokens).is_empty() {
            return Err(parse_error(raw));
        }
        Ok(Structure::from_canonical(canonical_text(&tokens)))
    }

    fn serialize(&self, structure: &Structure) -> String {
        structure.as_text().to_string()
    }

    fn sanitize(&self, structure: &Structure) -> Result<Structure, EngineError> {
        let tokens = self.tokens(structure)?;
        self.rebuild(&tokens, "sanitize")
    }

    fn remove_stereochemistry(&self, structure: &Structure) -> Result<Structure, EngineError> {
        let mut tokens = self.tokens(structure)?;
        tokens.retain(|t| !matches!(t, Token::Bond('/') | Token::Bond('\\')));
        for token in &mut tokens {
            if let Token::Bracket(atom) = token {
                atom.stereo = 0;
            }
        }
        self.rebuild(&tokens, "remove_stereochemistry")
    }

    fn neutralize_charges(&self, structure: &Structure) -> Result<Structure, EngineError> {
        let mut tokens = self.tokens(structure)?;
        for token in &mut tokens {
            if let Token::Bracket(atom) = token {
                atom.charge = 0;
            }
        }
        self.rebuild(&tokens, "neutralize_charges")
    }

    fn remove_explicit_hydrogens(&self, structure: &Structure) -> Result<Structure, EngineError> {
        // Sólo remueve átomos [H] acompañados dentro de su fragmento; un
        // fragmento que es únicamente [H] se conserva.
        let fragments = split_fragments(&self.tokens(structure)?);
        let mut kept = Vec::new();
        for fragment in fragments {
            if heavy_atom_count(&fragment) == 0 {
                kept.push(fragment);
                continue;
            }
            kept.push(strip_h_atoms(&fragment));
        }
        let tokens: Vec<Token> = kept
            .into_iter()
            .flat_map(|mut f| {
                f.push(Token::Dot);
                f
            })
            .collect();
        self.rebuild(&tokens, "remove_explicit_hydrogens")
    }

    fn remove_all_hydrogens(&self, structure: &Structure) -> Result<Structure, EngineError> {
        let mut tokens = strip_h_atoms(&self.tokens(structure)?);
        for token in &mut tokens {
            if let Token::Bracket(atom) = token {
                atom.hcount = 0;
            }
        }
        self.rebuild(&tokens, "remove_all_hydrogens")
    }

    fn fragment_count(&self, structure: &Structure) -> usize {
        match self.tokens(structure) {
            Ok(tokens) => split_fragments(&tokens).len(),
            Err(_) => 0,
        }
    }

    fn largest_fragment(&self, structure: &Structure) -> Result<Structure, EngineError> {
        let tokens = self.tokens(structure)?;
        let fragments = split_fragments(&tokens);
        let largest = fragments
            .iter()
            .max_by_key(|f| heavy_atom_count(f))
            .ok_or(EngineError::Operation { op: "largest_fragment", reason: "no fragments".into() })?;
        self.rebuild(largest, "largest_fragment")
    }

    fn contains_element(&self, structure: &Structure, symbol: &str) -> bool {
        match self.tokens(structure) {
            Ok(tokens) => element_counts(&tokens).iter().any(|(s, _)| s == symbol),
            Err(_) => false,
        }
    }

    fn has_foreign_atoms(&self, structure: &Structure) -> bool {
        match self.tokens(structure) {
            Ok(tokens) => element_counts(&tokens)
                .iter()
                .any(|(s, _)| !ORGANIC_ALLOWED.contains(&s.as_str())),
            Err(_) => false,
        }
    }

    fn molecular_weight(&self, structure: &Structure) -> Result<f64, EngineError> {
        let tokens = self.tokens(structure)?;
        let mut total = 0.0;
        for (symbol, count) in element_counts(&tokens) {
            let mass = atomic_mass(&symbol).ok_or_else(|| EngineError::Operation {
                op: "molecular_weight",
                reason: format!("no mass for element '{symbol}'"),
            })?;
            total += mass * f64::from(count);
        }
        Ok(total)
    }
}

/// Remueve átomos [H] sin modificadores junto con el enlace que los precede.
fn strip_h_atoms(tokens: &[Token]) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if is_explicit_h(token) {
            if matches!(out.last(), Some(Token::Bond(_))) {
                out.pop();
            }
            continue;
        }
        out.push(token.clone());
    }
    out
}
