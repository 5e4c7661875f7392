use crate::types::Mm;

/// Normalize a length expression to millimetres, the canonical unit.
///
/// Accepts `mm`, `cm`, `in`, `pt` and `px` suffixes; a bare number is
/// read as millimetres. Returns `None` for anything unparseable.
pub fn to_mm(raw: &str) -> Option<Mm> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let units: [(&str, f32); 5] = [
        ("mm", 1.0),
        ("cm", 10.0),
        ("in", 25.4),
        ("pt", 25.4 / 72.0),
        ("px", 25.4 / 96.0),
    ];
    for (unit, factor) in units {
        if let Some(value) = raw.strip_suffix(unit) {
            if let Ok(v) = value.trim().parse::<f32>() {
                return Some(Mm::from_f32(v * factor));
            }
            return None;
        }
    }
    if let Ok(v) = raw.parse::<f32>() {
        return Some(Mm::from_f32(v));
    }
    None
}
