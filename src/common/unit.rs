//! Length conversions between user-facing units and EMUs.
//!
//! DrawingML measures geometry in English Metric Units; font sizes are
//! stored in hundredths of a point.

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_PT: i64 = 12_700;

#[inline]
pub fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMUS_PER_INCH as f64).round() as i64
}

#[inline]
pub fn emu_to_inches(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_INCH as f64
}

#[inline]
pub fn pt_to_emu(pt: f64) -> i64 {
    (pt * EMUS_PER_PT as f64).round() as i64
}

/// Font size in the `sz` attribute unit (1/100 pt).
#[inline]
pub fn pt_to_centipoints(pt: f64) -> u32 {
    (pt * 100.0).round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inch_conversions() {
        assert_eq!(inches_to_emu(1.0), 914_400);
        assert_eq!(inches_to_emu(13.333), 12_191_695);
        assert_eq!(inches_to_emu(7.5), 6_858_000);
        assert!((emu_to_inches(457_200) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_point_conversions() {
        assert_eq!(pt_to_emu(1.0), 12_700);
        assert_eq!(pt_to_centipoints(18.0), 1800);
        assert_eq!(pt_to_centipoints(10.5), 1050);
    }
}
