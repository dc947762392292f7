// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! WhatsApp deep links for contacting leads.

/// Build a `wa.me` link that opens a chat with the number and the
/// message pre-filled.
///
/// The number must be E.164; the leading `+` is dropped because wa.me
/// expects bare digits.
pub fn wa_me_link(e164: &str, message: &str) -> String {
    let phone = e164.strip_prefix('+').unwrap_or(e164);
    format!(
        "https://wa.me/{}?text={}",
        phone,
        urlencoding::encode(message)
    )
}
