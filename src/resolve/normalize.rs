//! Canonicalization of free-text region names into comparable lookup keys.

/// Canonicalize a raw region name into a lookup key.
///
/// Steps, in order: uppercase, trim, fold accented letters to their base
/// letter, drop every character outside `[A-Z0-9 ]`, collapse whitespace
/// runs to a single space, trim again. Total for all inputs and idempotent:
/// `normalize(normalize(s)) == normalize(s)`.
///
/// The result is used only for lookup, never displayed.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());

    for ch in raw.chars() {
        let ch = fold_accent(ch).to_ascii_uppercase();
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
        } else if ch.is_whitespace() && !out.is_empty() && !out.ends_with(' ') {
            out.push(' ');
        }
        // Everything else (punctuation, combining marks, symbols) is dropped.
    }

    while out.ends_with(' ') {
        out.pop();
    }

    out
}

/// Fold the accented Latin letters the upstream source is known to emit
/// (Spanish region names) onto their unaccented base letter.
fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'Á' | 'À' | 'Â' | 'Ä' | 'Ã' => 'A',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'O',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ñ' | 'Ñ' => 'N',
        'ç' | 'Ç' => 'C',
        _ => ch,
    }
}
