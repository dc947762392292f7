// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Phone number masking and caret-preserving editing.
//!
//! The editor keeps two representations of a number: the logical digit
//! string (what gets submitted) and the masked display text (what the
//! operator sees). Every edit is reduced to an operation on the digit
//! string, the display is re-derived from scratch, and the caret is
//! carried across by its position in digit space rather than in text
//! space. That makes literal insertion and removal invisible to the
//! caret: it rides along as separators appear and disappear.
//!
//! All caret positions are character indices into the masked text.

pub mod countries;

use countries::{by_iso2, ddi_by_iso2, max_digits_by_iso2, placeholder_by_iso2};

// ─────────────────────────────────────────────────────────────────────────────
// Masking primitives
// ─────────────────────────────────────────────────────────────────────────────

/// Strip everything but ASCII digits.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Digit capacity of a mask: one per `#`.
pub fn max_digits(mask: &str) -> usize {
    mask.chars().filter(|c| *c == '#').count()
}

/// Render digits through a mask.
///
/// `#` consumes the next digit; any other mask character is a literal.
/// Literals are emitted only once at least one digit has been placed,
/// except for the literal prefix before the first slot, which shows as
/// soon as the value is non-empty. Digits beyond the mask's capacity
/// are dropped, never an error. An empty value renders as empty.
pub fn apply_mask(raw: &str, mask: &str) -> String {
    let digits = digits_only(raw);
    let limited: String = digits.chars().take(max_digits(mask)).collect();
    if limited.is_empty() {
        return String::new();
    }

    let first_slot = mask.chars().position(|c| c == '#');
    let mut result = String::new();
    let mut digit_iter = limited.chars();
    let mut placed = 0usize;

    for (index, mask_char) in mask.chars().enumerate() {
        if mask_char == '#' {
            match digit_iter.next() {
                Some(digit) => {
                    result.push(digit);
                    placed += 1;
                }
                None => break,
            }
            continue;
        }

        // Keep the literal prefix (like "(") once typing starts.
        if placed > 0 || first_slot.is_some_and(|slot| index < slot) {
            result.push(mask_char);
        }
    }

    result
}

/// Mask digits with a country's national mask.
///
/// Unknown countries render as bare digits.
pub fn format_national(raw: &str, iso2: &str) -> String {
    match by_iso2(iso2) {
        Some(country) => apply_mask(raw, country.national_mask),
        None => digits_only(raw),
    }
}

/// National digits of a stored E.164 number.
///
/// Strips the country's dial prefix when the number carries it;
/// otherwise returns all digits unchanged.
pub fn national_digits_from_e164(e164: &str, iso2: &str) -> String {
    let all_digits = digits_only(e164);
    let ddi_digits = digits_only(ddi_by_iso2(iso2));
    if ddi_digits.is_empty() {
        return all_digits;
    }
    match all_digits.strip_prefix(ddi_digits.as_str()) {
        Some(national) => national.to_string(),
        None => all_digits,
    }
}

/// Human-readable form of a stored number: dial prefix plus masked
/// national part, like `+55 (11) 98888-7777`.
///
/// Falls back to the raw E.164 text when the country is unknown or the
/// number has no digits to mask.
pub fn format_lead_phone(e164: &str, iso2: &str) -> String {
    let upper = iso2.to_uppercase();
    let ddi = ddi_by_iso2(&upper);
    if ddi.is_empty() {
        return e164.to_string();
    }
    let national = national_digits_from_e164(e164, &upper);
    let masked = format_national(&national, &upper);
    if masked.is_empty() {
        return e164.to_string();
    }
    format!("{} {}", ddi, masked)
}

// ─────────────────────────────────────────────────────────────────────────────
// Caret mapping
// ─────────────────────────────────────────────────────────────────────────────

/// How many digits sit strictly before a caret position.
pub fn count_digits_before_caret(value: &str, caret: usize) -> usize {
    value
        .chars()
        .take(caret)
        .filter(char::is_ascii_digit)
        .count()
}

/// Caret position sitting just after the `digit_index`-th digit of a
/// masked value. Index 0 (or less digits than asked for at the end of
/// the value) maps to the boundary positions.
pub fn caret_from_digit_index(masked: &str, digit_index: usize) -> usize {
    if digit_index == 0 {
        return 0;
    }
    let mut digits_seen = 0usize;
    for (index, ch) in masked.chars().enumerate() {
        if ch.is_ascii_digit() {
            digits_seen += 1;
            if digits_seen == digit_index {
                return index + 1;
            }
        }
    }
    masked.chars().count()
}

/// Remove the digit at a logical index, ignoring out-of-range indices.
pub fn remove_digit_at(digits: &str, index: usize) -> String {
    if index >= digits.chars().count() {
        return digits.to_string();
    }
    digits
        .chars()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, c)| c)
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Editor
// ─────────────────────────────────────────────────────────────────────────────

/// Stateful phone field: a country, its capped digit string, and the
/// edit operations a text input forwards to it.
///
/// The editor never stores masked text; [`PhoneEditor::masked`] derives
/// it on demand so display and digits cannot drift apart.
#[derive(Debug, Clone)]
pub struct PhoneEditor {
    iso2: String,
    digits: String,
}

impl PhoneEditor {
    /// Empty editor for the given country.
    pub fn new(iso2: &str) -> Self {
        Self {
            iso2: iso2.to_uppercase(),
            digits: String::new(),
        }
    }

    /// Editor pre-filled from a stored E.164 number, for editing an
    /// existing lead. Digits beyond the mask's capacity are dropped.
    pub fn from_e164(e164: &str, iso2: &str) -> Self {
        let mut editor = Self::new(iso2);
        let national = national_digits_from_e164(e164, &editor.iso2);
        editor.digits = national
            .chars()
            .take(max_digits_by_iso2(&editor.iso2))
            .collect();
        editor
    }

    /// Active country ISO2 code.
    pub fn country(&self) -> &str {
        &self.iso2
    }

    /// The logical digits, exactly what a submission should carry.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// The masked display text.
    pub fn masked(&self) -> String {
        format_national(&self.digits, &self.iso2)
    }

    /// Placeholder example for the active country.
    pub fn placeholder(&self) -> &'static str {
        placeholder_by_iso2(&self.iso2)
    }

    /// Dial prefix of the active country, empty when unknown.
    pub fn ddi(&self) -> &'static str {
        ddi_by_iso2(&self.iso2)
    }

    /// Full number for display, dial prefix included. Empty while no
    /// digits have been typed.
    pub fn full_display(&self) -> String {
        let masked = self.masked();
        if masked.is_empty() {
            return String::new();
        }
        format!("{} {}", self.ddi(), masked).trim().to_string()
    }

    /// Switch countries, keeping typed digits. Digits that no longer
    /// fit the new mask are truncated from the end.
    pub fn set_country(&mut self, iso2: &str) {
        self.iso2 = iso2.to_uppercase();
        let capacity = max_digits_by_iso2(&self.iso2);
        if self.digits.chars().count() > capacity {
            self.digits = self.digits.chars().take(capacity).collect();
        }
    }

    /// Apply a free-form edit of the field text.
    ///
    /// `text` is whatever the field contains after the edit, literals
    /// and stray characters included; `caret` is the caret position in
    /// that text, or `None` for end-of-text. Returns the caret position
    /// in the re-masked value, placed after the same digit it followed
    /// in the input.
    pub fn handle_input(&mut self, text: &str, caret: Option<usize>) -> usize {
        let capacity = max_digits_by_iso2(&self.iso2);
        let caret = caret.unwrap_or_else(|| text.chars().count());
        let caret_digit_index = count_digits_before_caret(text, caret);

        self.digits = digits_only(text).chars().take(capacity).collect();

        let masked = self.masked();
        caret_from_digit_index(&masked, caret_digit_index.min(self.digits.chars().count()))
    }

    /// Backspace with the caret at `caret` and no selection.
    ///
    /// When the character before the caret is a mask literal, the
    /// nearest digit to the left is removed instead and `Some(caret)`
    /// gives the new position. `None` means the key was not intercepted
    /// and the field should delete the digit itself, re-feeding the
    /// result through [`PhoneEditor::handle_input`].
    pub fn handle_backspace(&mut self, caret: usize) -> Option<usize> {
        if caret == 0 {
            return None;
        }
        let masked = self.masked();
        let before = masked.chars().nth(caret - 1)?;
        if before.is_ascii_digit() {
            return None;
        }

        let digit_index = count_digits_before_caret(&masked, caret);
        if digit_index > 0 {
            self.digits = remove_digit_at(&self.digits, digit_index - 1);
        }
        Some(caret_from_digit_index(
            &self.masked(),
            digit_index.saturating_sub(1),
        ))
    }

    /// Forward delete with the caret at `caret` and no selection.
    ///
    /// Mirror image of [`PhoneEditor::handle_backspace`]: a literal at
    /// the caret removes the next digit to the right.
    pub fn handle_delete(&mut self, caret: usize) -> Option<usize> {
        let masked = self.masked();
        if caret >= masked.chars().count() {
            return None;
        }
        let at_caret = masked.chars().nth(caret)?;
        if at_caret.is_ascii_digit() {
            return None;
        }

        let digit_index = count_digits_before_caret(&masked, caret);
        self.digits = remove_digit_at(&self.digits, digit_index);
        Some(caret_from_digit_index(&self.masked(), digit_index))
    }
}
