//! End-to-end tests for the keyed-grid digraph cipher.
//!
//! Fixed vectors use the classic MONARCHY grid:
//!
//! ```text
//! M O N A R
//! C H Y B D
//! E F G I K
//! L P Q S T
//! U V W X Z
//! ```

use classicrypt::error::ClassiCryptError;
use classicrypt::grid::DigraphRule;
use classicrypt::utils::format::{strip_fillers, Grouping};
use classicrypt::{build_grid, grid_decode, grid_encode, Fillers, GridCodec, GridOrder};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// ═══════════════════════════════════════════════════════════════════════
// Grid construction
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn monarchy_grid_rows() {
    let grid = build_grid("MONARCHY", GridOrder::Five);
    let rows: Vec<String> = grid.rows().collect();
    assert_eq!(rows, ["MONAR", "CHYBD", "EFGIK", "LPQST", "UVWXZ"]);
}

#[test]
fn key_is_case_insensitive_and_ignores_non_symbols() {
    let plain = build_grid("MONARCHY", GridOrder::Five);
    let noisy = build_grid("mon-ar chy!!", GridOrder::Five);
    assert_eq!(plain, noisy);
}

#[test]
fn order_five_merges_j_into_i() {
    let grid = build_grid("JUMP", GridOrder::Five);
    assert_eq!(grid.row(0).as_deref(), Some("IUMPA"));
    assert_eq!(grid.position_of('J'), grid.position_of('I'));
    assert!(!grid.symbols().contains('J'));
}

#[test]
fn order_six_keeps_j_and_digits() {
    let grid = build_grid("AGENT 007", GridOrder::Six);
    assert_eq!(grid.row(0).as_deref(), Some("AGENT0"));
    assert_eq!(grid.row(1).as_deref(), Some("7BCDFH"));
    assert_ne!(grid.position_of('J'), grid.position_of('I'));
    assert_eq!(grid.symbols().len(), 36);
}

#[test]
fn empty_key_is_plain_alphabet() {
    let grid = build_grid("", GridOrder::Five);
    assert_eq!(grid.symbols(), "ABCDEFGHIKLMNOPQRSTUVWXYZ");
}

// ═══════════════════════════════════════════════════════════════════════
// Known vectors
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn instruments_with_default_fillers() {
    let grid = build_grid("MONARCHY", GridOrder::Five);
    let out = grid_encode(&grid, "instruments");
    assert_eq!(out.prepared, "IN ST RU ME NT SX");
    assert_eq!(out.text, "GATLMZCLRQXA");

    let back = grid_decode(&grid, &out.text).unwrap();
    assert_eq!(back.text, "INSTRUMENTSX");
}

#[test]
fn instruments_with_z_padding() {
    let grid = build_grid("MONARCHY", GridOrder::Five);
    let codec = GridCodec::with_fillers(&grid, Fillers::new('Z', 'X')).unwrap();
    let out = codec.encode("INSTRUMENTS");
    assert_eq!(out.prepared, "IN ST RU ME NT SZ");
    assert_eq!(out.text, "GATLMZCLRQTX");
}

#[test]
fn balloon_splits_the_double_l() {
    let grid = build_grid("MONARCHY", GridOrder::Five);
    let out = grid_encode(&grid, "BALLOON");
    assert_eq!(out.prepared, "BA LX LO ON");
    assert_eq!(out.trace.len(), 4);
    assert_eq!(out.symbols.len(), 8);

    let back = grid_decode(&grid, &out.text).unwrap();
    assert_eq!(back.symbols, "BALXLOON");
    assert_eq!(strip_fillers(&back.symbols, Fillers::default()), "BALLOON");
}

#[test]
fn trace_records_rule_per_digraph() {
    let grid = build_grid("MONARCHY", GridOrder::Five);
    let out = grid_encode(&grid, "INSTRUMENTS");
    let rules: Vec<DigraphRule> = out.trace.iter().map(|s| s.rule).collect();
    assert_eq!(
        rules,
        [
            DigraphRule::Rectangle,
            DigraphRule::SameRow,
            DigraphRule::Rectangle,
            DigraphRule::SameColumn,
            DigraphRule::Rectangle,
            DigraphRule::SameColumn,
        ]
    );
    let rendered = out.trace.render();
    assert_eq!(rendered.lines().count(), 6);
    assert!(rendered.starts_with("1. IN"), "{rendered}");
}

// ═══════════════════════════════════════════════════════════════════════
// Passthrough characters
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn whitespace_keeps_its_offsets() {
    let grid = build_grid("MONARCHY", GridOrder::Five);
    let out = grid_encode(&grid, "in st");
    assert_eq!(out.text, "GA TL");
    assert_eq!(grid_decode(&grid, "GA TL").unwrap().text, "IN ST");
}

#[test]
fn padding_symbol_is_appended_after_last_character() {
    let grid = build_grid("MONARCHY", GridOrder::Five);
    // IN ST RU ME NT SX: the padding X has no slot of its own.
    let out = grid_encode(&grid, "instruments!");
    assert_eq!(out.text, "GATLMZCLRQX!A");
}

#[test]
fn digits_pass_through_order_five() {
    let grid = build_grid("MONARCHY", GridOrder::Five);
    let out = grid_encode(&grid, "in 42 st");
    assert_eq!(out.text, "GA 42 TL");
}

#[test]
fn digits_are_enciphered_in_order_six() {
    let grid = build_grid("AGENT 007", GridOrder::Six);
    let out = grid_encode(&grid, "MEET AT 10");
    assert_eq!(out.prepared, "ME ET AT 10");
    assert_ne!(out.symbols, "MEETAT10");
    assert_eq!(grid_decode(&grid, &out.text).unwrap().text, "MEET AT 10");
}

#[test]
fn grouping_regroups_compact_symbols() {
    let grid = build_grid("MONARCHY", GridOrder::Five);
    let out = grid_encode(&grid, "instruments");
    assert_eq!(Grouping::Fives.apply(&out.symbols), "GATLM ZCLRQ XA");
    assert_eq!(Grouping::Pairs.apply(&out.symbols), "GA TL MZ CL RQ XA");
}

// ═══════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn decode_rejects_odd_symbol_count() {
    let grid = build_grid("MONARCHY", GridOrder::Five);
    assert!(matches!(
        grid_decode(&grid, "GAT"),
        Err(ClassiCryptError::MalformedCiphertext(_))
    ));
    // Passthrough characters do not count.
    assert!(matches!(
        grid_decode(&grid, "GA T!"),
        Err(ClassiCryptError::MalformedCiphertext(_))
    ));
}

#[test]
fn filler_must_be_a_grid_symbol() {
    let five = build_grid("MONARCHY", GridOrder::Five);
    assert_eq!(
        GridCodec::with_fillers(&five, Fillers::new('J', 'Q')).unwrap_err(),
        ClassiCryptError::InvalidFiller('J')
    );
    let six = build_grid("MONARCHY", GridOrder::Six);
    let digit_padding = Fillers::new('J', '0');
    assert!(GridCodec::with_fillers(&six, digit_padding).is_ok());
}

#[test]
fn invalid_order_is_rejected() {
    assert_eq!(
        GridOrder::try_from(4).unwrap_err(),
        ClassiCryptError::InvalidGridOrder(4)
    );
    assert_eq!(GridOrder::try_from(6).unwrap(), GridOrder::Six);
}

// ═══════════════════════════════════════════════════════════════════════
// Properties
// ═══════════════════════════════════════════════════════════════════════

fn grid_order() -> impl Strategy<Value = GridOrder> {
    prop_oneof![Just(GridOrder::Five), Just(GridOrder::Six)]
}

fn space_offsets(text: &str) -> Vec<usize> {
    text.chars()
        .enumerate()
        .filter(|&(_, c)| c == ' ')
        .map(|(i, _)| i)
        .collect()
}

proptest! {
    #[test]
    fn grid_holds_every_symbol_once(key in "[ -~]{0,40}", order in grid_order()) {
        let grid = build_grid(&key, order);
        let mut symbols: Vec<char> = grid.symbols().chars().collect();
        prop_assert_eq!(symbols.len(), order.cells());
        symbols.sort_unstable();
        symbols.dedup();
        prop_assert_eq!(symbols.len(), order.cells());
    }

    #[test]
    fn decode_inverts_encode(
        key in "[A-Za-z0-9]{0,20}",
        text in "[A-Za-z0-9 ,.]{0,60}",
        order in grid_order(),
    ) {
        let grid = build_grid(&key, order);
        let encoded = grid_encode(&grid, &text);
        prop_assert_eq!(encoded.symbols.chars().count() % 2, 0);

        let decoded = grid_decode(&grid, &encoded.text).unwrap();
        prop_assert_eq!(decoded.symbols, encoded.prepared.replace(' ', ""));
    }

    #[test]
    fn spaces_keep_their_offsets(
        key in "[A-Za-z]{0,20}",
        text in "[A-Za-z ]{0,60}",
        order in grid_order(),
    ) {
        let grid = build_grid(&key, order);
        let encoded = grid_encode(&grid, &text);
        // Symbols added by pairing go after the last original character,
        // so every space stays where it was.
        prop_assert_eq!(space_offsets(&encoded.text), space_offsets(&text));

        let decoded = grid_decode(&grid, &encoded.text).unwrap();
        prop_assert_eq!(space_offsets(&decoded.text), space_offsets(&encoded.text));
        prop_assert_eq!(decoded.text.chars().count(), encoded.text.chars().count());
    }

    #[test]
    fn prepared_pairs_never_repeat_a_symbol(text in "[A-Za-z]{0,60}") {
        let grid = build_grid("MONARCHY", GridOrder::Five);
        let encoded = grid_encode(&grid, &text);
        for pair in encoded.prepared.split_whitespace() {
            let chars: Vec<char> = pair.chars().collect();
            prop_assert_eq!(chars.len(), 2);
            prop_assert_ne!(chars[0], chars[1]);
        }
    }
}
