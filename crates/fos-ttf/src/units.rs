//! Design unit conversion

/// Convert a value in font design units to an output scale.
///
/// Non-negative values are split into whole ems and remainder so the
/// intermediate product stays small:
/// `(n / upem) * scale + ((n % upem) * scale) / upem`.
/// Negative values are converted by magnitude and negated, so results
/// truncate toward zero on both sides.
pub fn convert(n: i32, units_per_em: u16, scale: i32) -> i32 {
    let upem = i64::from(units_per_em.max(1));
    let n = i64::from(n);
    let scale = i64::from(scale);
    let result = if n < 0 {
        -((-n * scale) / upem)
    } else {
        (n / upem) * scale + ((n % upem) * scale) / upem
    };
    result.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Convert to the conventional 1000-unit PDF text space
pub fn to_pdf_units(n: i32, units_per_em: u16) -> i32 {
    convert(n, units_per_em, 1000)
}
