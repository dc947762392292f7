// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Country catalogue for phone capture.
//!
//! Each entry carries the dial prefix and the national display mask used
//! by the editor. The catalogue is intentionally small: it covers the
//! countries leads actually come from, and unknown countries fall back
//! to a generous unformatted mask.

/// One selectable country.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub iso2: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
    /// International dial prefix, with the leading `+`.
    pub ddi: &'static str,
    /// National mask where `#` marks a digit slot.
    pub national_mask: &'static str,
    /// Example number shown while the field is empty.
    pub national_placeholder: &'static str,
}

impl Country {
    /// Picker label, flag first.
    pub fn display(&self) -> String {
        format!("{} {}", self.flag, self.name)
    }

    /// Digit capacity of this country's mask.
    pub fn max_digits(&self) -> usize {
        self.national_mask.chars().filter(|c| *c == '#').count()
    }
}

/// Mask applied when the country is not in the catalogue: plain digits,
/// capped at the E.164 maximum of 15.
pub const FALLBACK_MASK: &str = "###############";

/// Placeholder applied when the country is not in the catalogue.
pub const FALLBACK_PLACEHOLDER: &str = "11988887777";

/// All selectable countries, ordered by ISO2 code.
pub const COUNTRIES: &[Country] = &[
    Country { iso2: "AR", name: "Argentina", flag: "🇦🇷", ddi: "+54", national_mask: "(##) ####-####", national_placeholder: "(11) 1234-5678" },
    Country { iso2: "AU", name: "Australia", flag: "🇦🇺", ddi: "+61", national_mask: "#### ### ###", national_placeholder: "0412 345 678" },
    Country { iso2: "BE", name: "Belgium", flag: "🇧🇪", ddi: "+32", national_mask: "### ## ## ##", national_placeholder: "470 12 34 56" },
    Country { iso2: "BR", name: "Brasil", flag: "🇧🇷", ddi: "+55", national_mask: "(##) #####-####", national_placeholder: "(11) 98888-7777" },
    Country { iso2: "CA", name: "Canada", flag: "🇨🇦", ddi: "+1", national_mask: "(###) ###-####", national_placeholder: "(604) 555-1234" },
    Country { iso2: "CH", name: "Switzerland", flag: "🇨🇭", ddi: "+41", national_mask: "## ### ## ##", national_placeholder: "78 123 45 67" },
    Country { iso2: "CL", name: "Chile", flag: "🇨🇱", ddi: "+56", national_mask: "# #### ####", national_placeholder: "9 6123 4567" },
    Country { iso2: "CN", name: "China", flag: "🇨🇳", ddi: "+86", national_mask: "### #### ####", national_placeholder: "131 2345 6789" },
    Country { iso2: "CO", name: "Colombia", flag: "🇨🇴", ddi: "+57", national_mask: "### #######", national_placeholder: "321 1234567" },
    Country { iso2: "DE", name: "Germany", flag: "🇩🇪", ddi: "+49", national_mask: "#### ########", national_placeholder: "1512 3456789" },
    Country { iso2: "DK", name: "Denmark", flag: "🇩🇰", ddi: "+45", national_mask: "## ## ## ##", national_placeholder: "20 12 34 56" },
    Country { iso2: "ES", name: "Spain", flag: "🇪🇸", ddi: "+34", national_mask: "### ## ## ##", national_placeholder: "612 34 56 78" },
    Country { iso2: "FR", name: "France", flag: "🇫🇷", ddi: "+33", national_mask: "# ## ## ## ##", national_placeholder: "6 12 34 56 78" },
    Country { iso2: "GB", name: "United Kingdom", flag: "🇬🇧", ddi: "+44", national_mask: "#### ######", national_placeholder: "7400 123456" },
    Country { iso2: "IE", name: "Ireland", flag: "🇮🇪", ddi: "+353", national_mask: "## ### ####", national_placeholder: "85 123 4567" },
    Country { iso2: "IN", name: "India", flag: "🇮🇳", ddi: "+91", national_mask: "##### #####", national_placeholder: "98765 43210" },
    Country { iso2: "IT", name: "Italy", flag: "🇮🇹", ddi: "+39", national_mask: "### ### ####", national_placeholder: "312 345 6789" },
    Country { iso2: "JP", name: "Japan", flag: "🇯🇵", ddi: "+81", national_mask: "## #### ####", national_placeholder: "90 1234 5678" },
    Country { iso2: "KR", name: "South Korea", flag: "🇰🇷", ddi: "+82", national_mask: "## #### ####", national_placeholder: "10 1234 5678" },
    Country { iso2: "MX", name: "Mexico", flag: "🇲🇽", ddi: "+52", national_mask: "## #### ####", national_placeholder: "55 1234 5678" },
    Country { iso2: "NL", name: "Netherlands", flag: "🇳🇱", ddi: "+31", national_mask: "# ########", national_placeholder: "6 12345678" },
    Country { iso2: "NO", name: "Norway", flag: "🇳🇴", ddi: "+47", national_mask: "### ## ###", national_placeholder: "406 12 345" },
    Country { iso2: "NZ", name: "New Zealand", flag: "🇳🇿", ddi: "+64", national_mask: "## ### ####", national_placeholder: "21 123 4567" },
    Country { iso2: "PE", name: "Peru", flag: "🇵🇪", ddi: "+51", national_mask: "### ### ###", national_placeholder: "912 345 678" },
    Country { iso2: "PT", name: "Portugal", flag: "🇵🇹", ddi: "+351", national_mask: "### ### ###", national_placeholder: "912 345 678" },
    Country { iso2: "PY", name: "Paraguay", flag: "🇵🇾", ddi: "+595", national_mask: "### ######", national_placeholder: "981 123456" },
    Country { iso2: "SE", name: "Sweden", flag: "🇸🇪", ddi: "+46", national_mask: "## ### ## ##", national_placeholder: "70 123 45 67" },
    Country { iso2: "US", name: "United States", flag: "🇺🇸", ddi: "+1", national_mask: "(###) ###-####", national_placeholder: "(201) 555-0123" },
    Country { iso2: "UY", name: "Uruguay", flag: "🇺🇾", ddi: "+598", national_mask: "## ### ###", national_placeholder: "94 123 456" },
];

/// Look up a country by ISO2 code, case-insensitively.
pub fn by_iso2(iso2: &str) -> Option<&'static Country> {
    let upper = iso2.to_uppercase();
    COUNTRIES.iter().find(|country| country.iso2 == upper)
}

/// Resolve free-form input to an ISO2 code.
///
/// Accepts a country name, a picker display string, or an ISO2 code.
/// Bare two-letter input is only treated as ISO2, never as a name.
pub fn resolve_iso2(value: &str) -> Option<&'static str> {
    let normalized = value.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    if let Some(country) = COUNTRIES.iter().find(|country| {
        country.name.to_lowercase() == normalized || country.display().to_lowercase() == normalized
    }) {
        return Some(country.iso2);
    }

    if normalized.chars().count() == 2 {
        return COUNTRIES
            .iter()
            .find(|country| country.iso2.to_lowercase() == normalized)
            .map(|country| country.iso2);
    }

    None
}

/// Picker label for an ISO2 code, or the uppercased code itself when
/// the country is unknown.
pub fn display_by_iso2(iso2: &str) -> String {
    by_iso2(iso2)
        .map(|country| country.display())
        .unwrap_or_else(|| iso2.to_uppercase())
}

/// National mask for an ISO2 code, with the 15-slot fallback.
pub fn mask_by_iso2(iso2: &str) -> &'static str {
    by_iso2(iso2)
        .map(|country| country.national_mask)
        .unwrap_or(FALLBACK_MASK)
}

/// Placeholder example for an ISO2 code.
pub fn placeholder_by_iso2(iso2: &str) -> &'static str {
    by_iso2(iso2)
        .map(|country| country.national_placeholder)
        .unwrap_or(FALLBACK_PLACEHOLDER)
}

/// Dial prefix for an ISO2 code, or empty when unknown.
pub fn ddi_by_iso2(iso2: &str) -> &'static str {
    by_iso2(iso2).map(|country| country.ddi).unwrap_or("")
}

/// Digit capacity of the mask for an ISO2 code.
pub fn max_digits_by_iso2(iso2: &str) -> usize {
    mask_by_iso2(iso2).chars().filter(|c| *c == '#').count()
}

/// CDN URL for a 40px-wide flag image.
pub fn flag_png_url(iso2: &str) -> String {
    format!("https://flagcdn.com/w40/{}.png", iso2.to_lowercase())
}
