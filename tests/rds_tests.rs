//! Tests for RDS group decoding
//!
//! Run with: cargo test --no-default-features --features std --test rds_tests

use rds_tuner::rds::station::AfCode;
use rds_tuner::rds::{AltFrequencies, CallSign, OdaRegistry, RdsDecoder};
use rds_tuner::types::{FmFrequency, GroupType, PtyRegion, RawGroup, Version};

const PI: u16 = 0x54A8;

/// Group type 0A/0B block B
fn basic_b(segment: u16, version_b: bool) -> u16 {
    let version = if version_b { 0x0800 } else { 0 };
    version | (segment & 0x3)
}

fn ps_group(segment: u16, chars: &[u8; 2]) -> RawGroup {
    RawGroup::new(PI, basic_b(segment, false), 0xE0CD, u16::from_be_bytes(*chars))
}

fn rt_group(segment: u16, chars: &[u8; 4]) -> RawGroup {
    RawGroup::new(
        PI,
        0x2000 | (segment & 0xF),
        u16::from_be_bytes([chars[0], chars[1]]),
        u16::from_be_bytes([chars[2], chars[3]]),
    )
}

fn send_ps(dec: &mut RdsDecoder, name: &[u8; 8]) {
    for seg in 0..4 {
        let i = seg * 2;
        dec.decode(ps_group(seg as u16, &[name[i], name[i + 1]]));
    }
}

fn send_rt(dec: &mut RdsDecoder, text: &[u8]) {
    for (seg, chunk) in text.chunks(4).enumerate() {
        let mut bytes = [b' '; 4];
        bytes[..chunk.len()].copy_from_slice(chunk);
        dec.decode(rt_group(seg as u16, &bytes));
    }
}

// ============================================================================
// Call Sign Derivation
// ============================================================================

#[test]
fn call_sign_european_local() {
    // 0x1000: second nibble zero
    let call = CallSign::from_pi(0x1000).unwrap();
    assert_eq!(call.as_str(), "ABAA");
}

#[test]
fn call_sign_european_test_mode() {
    let call = CallSign::from_pi(0x2300).unwrap();
    assert_eq!(call.as_str(), "AFCD");
}

#[test]
fn call_sign_first_k() {
    // 4096 is also 0x1000, which the European rule claims first
    assert_eq!(CallSign::from_pi(4096).unwrap().as_str(), "ABAA");
    // 0x1101: base 257 = 0*676 + 9*26 + 23
    assert_eq!(CallSign::from_pi(0x1101).unwrap().as_str(), "KAJX");
}

#[test]
fn call_sign_first_w() {
    assert_eq!(CallSign::from_pi(21_672).unwrap().as_str(), "WAAA");
}

#[test]
fn call_sign_k_range_end() {
    assert_eq!(CallSign::from_pi(21_671).unwrap().as_str(), "KZZZ");
}

#[test]
fn call_sign_highest_na() {
    assert_eq!(CallSign::from_pi(39_247).unwrap().as_str(), "WZZZ");
}

#[test]
fn call_sign_out_of_range() {
    assert!(CallSign::from_pi(50_000).is_none());
}

#[test]
fn call_sign_commits_after_consensus() {
    let mut dec = RdsDecoder::new();
    let group = RawGroup::new(21_672, 0x9000, 0, 0);
    assert!(!dec.decode(group).call_sign);
    assert!(!dec.decode(group).call_sign);
    assert!(dec.decode(group).call_sign);
    assert_eq!(dec.station().call_sign().unwrap().as_str(), "WAAA");
    assert!(!dec.decode(group).call_sign);
}

#[test]
fn unknown_pi_still_recorded() {
    let mut dec = RdsDecoder::new();
    for _ in 0..3 {
        dec.decode(RawGroup::new(50_000, 0x9000, 0, 0));
    }
    assert_eq!(dec.station().pi(), Some(50_000));
    assert!(dec.station().call_sign().is_none());
}

// ============================================================================
// Program Service
// ============================================================================

#[test]
fn program_service_commits_after_two_rounds() {
    let mut dec = RdsDecoder::new();
    send_ps(&mut dec, b"KQED  FM");
    send_ps(&mut dec, b"KQED  FM");
    assert_eq!(dec.station().program_service(), "");

    dec.decode(ps_group(0, b"KQ"));
    assert_eq!(dec.station().program_service(), "KQED  FM");
}

#[test]
fn program_service_masks_high_bit() {
    let mut dec = RdsDecoder::new();
    for _ in 0..3 {
        send_ps(&mut dec, &[b'A' | 0x80, b'B', b'C', b'D', b'E', b'F', b'G', b'H']);
    }
    assert_eq!(dec.station().program_service(), "ABCDEFGH");
}

#[test]
fn basic_tuning_flags() {
    let mut dec = RdsDecoder::new();
    // M/S set, TA set, DI bit set on segment 1
    dec.decode(RawGroup::new(PI, 0x0008 | 0x0010 | 0x0004 | 0x1, 0, 0));
    let station = dec.station();
    assert!(station.music());
    assert!(station.traffic_announcement());
    assert!(station.decoder_identification().artificial_head);
    assert!(!station.decoder_identification().stereo);

    dec.decode(RawGroup::new(PI, 0x0002, 0, 0));
    let station = dec.station();
    assert!(!station.music());
    assert!(!station.traffic_announcement());
    assert!(!station.decoder_identification().compressed);
}

#[test]
fn traffic_program_and_pty_are_immediate() {
    let mut dec = RdsDecoder::new();
    dec.decode(RawGroup::new(PI, 0x9000 | 0x0020 | (5 << 5), 0, 0));
    assert!(dec.station().traffic_program());
    assert_eq!(dec.station().program_type().code(), 5);
    assert_eq!(dec.station().program_type_name(PtyRegion::NorthAmerica), "Rock");

    // TP shares its bit with the lowest PTY bit
    dec.decode(RawGroup::new(PI, 0x9000 | (6 << 5), 0, 0));
    assert!(!dec.station().traffic_program());
    assert_eq!(dec.station().program_type().code(), 6);
}

// ============================================================================
// Radiotext
// ============================================================================

#[test]
fn radiotext_truncates_at_terminator() {
    let mut dec = RdsDecoder::new();
    for _ in 0..2 {
        send_rt(&mut dec, b"HELLO\rXXXX");
    }
    dec.decode(rt_group(0, b"HELL"));
    assert_eq!(dec.station().radiotext(), "HELLO");
}

#[test]
fn radiotext_blanks_stale_tail() {
    let mut dec = RdsDecoder::new();
    let long = b"THE QUICK BROWN FOX JUMPS OVER THE LAZY DOG";
    for _ in 0..3 {
        send_rt(&mut dec, long);
    }
    assert!(dec.station().radiotext().starts_with("THE QUICK"));

    // New short message: the old tail never leaks into it
    for _ in 0..2 {
        send_rt(&mut dec, b"HI\r ");
    }
    dec.decode(rt_group(0, b"HI\r "));
    assert_eq!(dec.station().radiotext(), "HI");
}

#[test]
fn radiotext_without_terminator_is_full_buffer() {
    let mut dec = RdsDecoder::new();
    let text = [b'x'; 64];
    for _ in 0..3 {
        send_rt(&mut dec, &text);
    }
    assert_eq!(dec.station().radiotext().len(), 64);
}

// ============================================================================
// Alternate Frequencies
// ============================================================================

#[test]
fn af_code_valid_frequency() {
    let mut dec = RdsDecoder::new();
    // Code 50 high, 0 low
    dec.decode(RawGroup::new(PI, 0x0000, 50 << 8, 0));
    let af = dec.station().alt_frequencies();
    assert!(af.contains(FmFrequency::from_khz(92_500).unwrap()));
    assert!(af.contains_mhz(92.5));
    assert_eq!(af.len(), 1);
}

#[test]
fn af_code_count() {
    let mut dec = RdsDecoder::new();
    dec.decode(RawGroup::new(PI, 0x0000, (230 << 8) | 255, 0));
    let af = dec.station().alt_frequencies();
    assert_eq!(af.expected_count(), Some(6));
    assert!(af.is_empty());
}

#[test]
fn af_codes_zero_and_255_ignored() {
    let mut dec = RdsDecoder::new();
    dec.decode(RawGroup::new(PI, 0x0000, 255, 0));
    let af = dec.station().alt_frequencies();
    assert!(af.is_empty());
    assert_eq!(af.expected_count(), None);
}

#[test]
fn af_code_classification() {
    assert_eq!(AfCode::classify(0), AfCode::NotUsed);
    assert_eq!(AfCode::classify(1), AfCode::Frequency(FmFrequency::from_khz(87_600).unwrap()));
    assert_eq!(AfCode::classify(204), AfCode::Frequency(FmFrequency::MAX));
    assert_eq!(AfCode::classify(205), AfCode::Filler);
    assert_eq!(AfCode::classify(210), AfCode::Unassigned);
    assert_eq!(AfCode::classify(224), AfCode::Count(0));
    assert_eq!(AfCode::classify(249), AfCode::Count(25));
    assert_eq!(AfCode::classify(250), AfCode::LfMfFollows);
    assert_eq!(AfCode::classify(251), AfCode::Unassigned);
}

#[test]
fn af_duplicates_are_kept_once() {
    let mut dec = RdsDecoder::new();
    dec.decode(RawGroup::new(PI, 0x0000, (50 << 8) | 50, 0));
    dec.decode(RawGroup::new(PI, 0x0001, (50 << 8) | 51, 0));
    assert_eq!(dec.station().alt_frequencies().len(), 2);
}

#[test]
fn af_list_full_drops_new_frequencies() {
    let mut af = AltFrequencies::default();
    for code in 1..=32u8 {
        assert!(af.apply(code));
    }
    assert_eq!(af.len(), 32);

    assert!(!af.apply(33));
    assert_eq!(af.len(), 32);
    assert!(!af.contains_mhz(90.8));
    // Known frequencies still report unchanged
    assert!(!af.apply(1));
}

// ============================================================================
// Open Data Applications
// ============================================================================

#[test]
fn oda_registers_payload_by_slot() {
    let mut dec = RdsDecoder::new();
    // 3A, ODA group selector 0x0C (6A), AID 0x4BD7
    dec.decode(RawGroup::new(PI, 0x3000 | 0x0C, 0, 0x4BD7));
    let table = dec.station().oda().get(PI).unwrap();
    assert_eq!(table[0x0C], 0x4BD7);
    assert_eq!(table.iter().filter(|&&w| w != 0).count(), 1);
    assert_eq!(OdaRegistry::application_name(table[0x0C]), Some("RadioText+ (RT+)"));
}

#[test]
fn oda_version_b_is_ignored() {
    let mut dec = RdsDecoder::new();
    dec.decode(RawGroup::new(PI, 0x3800 | 0x0C, 0, 0x4BD7));
    assert!(dec.station().oda().is_empty());
}

// ============================================================================
// Robustness
// ============================================================================

#[test]
fn unknown_group_type_only_touches_immediate_fields() {
    let mut dec = RdsDecoder::new();
    for _ in 0..3 {
        send_ps(&mut dec, b"KQED  FM");
    }
    let before = dec.snapshot();

    // Group 9A with TP set and PTY 3
    dec.decode(RawGroup::new(0x1234, 0x9000 | 0x0020 | (3 << 5), 0xFFFF, 0xFFFF));
    let after = dec.station();

    assert_eq!(after.pi(), Some(0x1234));
    assert!(after.traffic_program());
    assert_eq!(after.program_type().code(), 3);

    assert_eq!(after.call_sign(), before.call_sign());
    assert_eq!(after.program_service(), before.program_service());
    assert_eq!(after.radiotext(), before.radiotext());
    assert_eq!(after.music(), before.music());
    assert_eq!(after.traffic_announcement(), before.traffic_announcement());
    assert_eq!(after.decoder_identification(), before.decoder_identification());
    assert_eq!(after.alt_frequencies().len(), before.alt_frequencies().len());
    assert_eq!(after.oda().len(), before.oda().len());
}

#[test]
fn program_item_group_is_a_no_op() {
    let mut dec = RdsDecoder::new();
    dec.decode(RawGroup::new(PI, 0x1000 | 0x001F, 0xFFFF, 0xFFFF));
    assert_eq!(dec.station().program_service(), "");
    assert!(dec.station().alt_frequencies().is_empty());
    assert_eq!(dec.stats().count(GroupType::PROGRAM_ITEM, Version::A), 1);
}

#[test]
fn repeated_group_commits_once() {
    let mut dec = RdsDecoder::new();
    send_ps(&mut dec, b"KQED  FM");
    send_ps(&mut dec, b"KQED  FM");

    let seg0 = ps_group(0, b"KQ");
    assert!(dec.decode(seg0).program_service);
    assert!(!dec.decode(seg0).program_service);
    assert_eq!(dec.station().program_service(), "KQED  FM");
}

#[test]
fn reset_clears_everything() {
    let mut dec = RdsDecoder::new();
    for _ in 0..3 {
        send_ps(&mut dec, b"KQED  FM");
    }
    assert_eq!(dec.station().program_service(), "KQED  FM");

    dec.reset();
    assert_eq!(dec.station().program_service(), "");
    assert!(dec.station().pi().is_none());
    assert!(dec.station().alt_frequencies().is_empty());
    assert_eq!(dec.stats().groups(), 0);
}
