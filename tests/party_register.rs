use kinabalu::domain::{PartyAlignment, PartyRegister, UNKNOWN_PARTY};

#[test]
fn given_every_known_alias_when_resolved_then_maps_to_its_canonical_code() {
    let register = PartyRegister::uk_commons_2024();

    let cases = [
        ("lab", "Lab"),
        ("Labour", "Lab"),
        ("Labour (Co-op)", "Lab"),
        ("con", "Con"),
        ("Conservative", "Con"),
        ("ld", "LD"),
        ("Lib Dem", "LD"),
        ("Liberal Democrat", "LD"),
        ("snp", "SNP"),
        ("Scottish National Party", "SNP"),
        ("green", "Green"),
        ("Green Party", "Green"),
        ("dup", "DUP"),
        ("Democratic Unionist Party", "DUP"),
        ("ruk", "RUK"),
        ("Reform", "RUK"),
        ("Reform UK", "RUK"),
        ("pc", "PC"),
        ("Plaid Cymru", "PC"),
        ("ind", "Ind"),
        ("Independent", "Ind"),
    ];

    for (alias, expected) in cases {
        assert_eq!(register.canonical(alias), expected, "alias '{alias}'");
    }
}

#[test]
fn given_unknown_party_text_when_resolved_then_returns_the_unknown_sentinel() {
    let register = PartyRegister::uk_commons_2024();

    assert_eq!(register.canonical("Monster Raving Loony"), UNKNOWN_PARTY);
    assert_eq!(register.canonical(""), UNKNOWN_PARTY);
    assert_eq!(register.canonical("   "), UNKNOWN_PARTY);
}

#[test]
fn given_mixed_case_and_padding_when_resolved_then_lookup_is_insensitive_to_both() {
    let register = PartyRegister::uk_commons_2024();

    assert_eq!(register.canonical("  LABOUR  "), "Lab");
    assert_eq!(register.canonical("CoNsErVaTiVe"), "Con");
}

#[test]
fn given_already_canonical_code_when_resolved_then_passes_through_unchanged() {
    let register = PartyRegister::uk_commons_2024();

    assert_eq!(register.canonical("Lab"), "Lab");
    assert_eq!(register.canonical("SNP"), "SNP");
}

#[test]
fn given_commons_2024_register_then_alignment_splits_government_and_opposition() {
    let register = PartyRegister::uk_commons_2024();

    assert_eq!(register.alignment("Lab"), PartyAlignment::Government);
    assert_eq!(register.alignment("Con"), PartyAlignment::Opposition);
    assert_eq!(register.alignment("SNP"), PartyAlignment::Opposition);
    assert_eq!(register.alignment("Ind"), PartyAlignment::Other);
    assert_eq!(register.alignment(UNKNOWN_PARTY), PartyAlignment::Other);
}

#[test]
fn given_custom_register_when_injected_then_classification_follows_it() {
    let register = PartyRegister::new(
        [("gov party".to_string(), "GOV".to_string())],
        ["GOV".to_string()],
        ["OPP".to_string()],
    );

    assert_eq!(register.canonical("Gov Party"), "GOV");
    assert_eq!(register.alignment("GOV"), PartyAlignment::Government);
    assert_eq!(register.alignment("OPP"), PartyAlignment::Opposition);
    assert_eq!(register.canonical("Lab"), UNKNOWN_PARTY);
}
