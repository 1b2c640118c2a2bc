// src/noyau/jetons.rs

use super::erreur::{Erreur, Resultat};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tok {
    /// Littéral numérique tel qu’écrit (radix, exposant, suffixe d’unité compris)
    Num(String),

    // Fonctions + variables + mots-clés
    // NOTE: le parse décidera si c’est un appel (suivi de '(') ou une valeur.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^

    LPar,
    RPar,
    Virgule,
    PointVirgule,
}

fn est_debut_ident(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn est_suite_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - nombres : 12, 1.5, .5, 2e-3, 0xff, 0b101, 017, suffixe d’unité 3_m, 2_m^2
/// - opérateurs + - * / ^
/// - parenthèses ( ), virgule d’arguments, point-virgule entre expressions
/// - identifiants [a-zA-Z_][a-zA-Z0-9_]* (casse conservée : les variables y sont sensibles)
/// - π (équivaut à ident("pi")), √ (équivaut à ident("sqrt"))
pub fn tokenize(s: &str) -> Resultat<Vec<Tok>> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            ',' => Some(Tok::Virgule),
            ';' => Some(Tok::PointVirgule),
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Minus),
            '*' => Some(Tok::Star),
            '/' => Some(Tok::Slash),
            '^' => Some(Tok::Caret),
            'π' => Some(Tok::Ident("pi".to_string())),
            '√' => Some(Tok::Ident("sqrt".to_string())),
            _ => None,
        };
        if let Some(t) = simple {
            out.push(t);
            i += 1;
            continue;
        }

        // Identifiants ASCII
        if est_debut_ident(c) {
            let start = i;
            i += 1;
            while i < chars.len() && est_suite_ident(chars[i]) {
                i += 1;
            }
            out.push(Tok::Ident(chars[start..i].iter().collect()));
            continue;
        }

        // Nombre
        let point_chiffre = c == '.' && chars.get(i + 1).is_some_and(|d| d.is_ascii_digit());
        if c.is_ascii_digit() || point_chiffre {
            let start = i;
            i = lit_nombre(&chars, i);
            out.push(Tok::Num(chars[start..i].iter().collect()));
            continue;
        }

        return Err(Erreur::parse(format!("caractère inattendu: '{c}'")));
    }

    Ok(out)
}

/// Avance sur un littéral numérique commençant en `i` ; renvoie l’indice de fin.
fn lit_nombre(chars: &[char], mut i: usize) -> usize {
    let radix = if chars[i] == '0' {
        match chars.get(i + 1) {
            Some('x') | Some('X') => Some(16),
            Some('b') | Some('B') => Some(2),
            _ => None,
        }
    } else {
        None
    };

    match radix {
        Some(base) if chars.get(i + 2).is_some_and(|d| d.is_digit(base)) => {
            i += 2;
            while i < chars.len() && (chars[i].is_digit(base) || chars[i] == '.') {
                i += 1;
            }
        }
        _ => {
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            // exposant : e, E suivi d’un chiffre (signe optionnel)
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let j = match chars.get(i + 1) {
                    Some('+') | Some('-') => i + 2,
                    _ => i + 1,
                };
                if chars.get(j).is_some_and(|d| d.is_ascii_digit()) {
                    i = j;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
        }
    }

    // suffixe d’unité : _m, _km, _m^2
    if i < chars.len() && chars[i] == '_' {
        i += 1;
        while i < chars.len() && (est_suite_ident(chars[i]) || chars[i] == '^') {
            i += 1;
        }
    }
    i
}

/// Format utilitaire (journalisation) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    tokens
        .iter()
        .map(|t| match t {
            Tok::Num(s) | Tok::Ident(s) => s.as_str(),
            Tok::Plus => "+",
            Tok::Minus => "-",
            Tok::Star => "*",
            Tok::Slash => "/",
            Tok::Caret => "^",
            Tok::LPar => "(",
            Tok::RPar => ")",
            Tok::Virgule => ",",
            Tok::PointVirgule => ";",
        })
        .collect::<Vec<_>>()
        .join(" ")
}
