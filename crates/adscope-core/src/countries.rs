//! Country presets for collection runs.

/// Broad sweep preset: every ad-library country code except the operator's
/// home market (`BR`), which is handled by a separate editorial process.
pub const DEFAULT_SWEEP_COUNTRIES: &[&str] = &[
    "US", "IN", "GB", "CA", "AR", "AU", "AT", "BE", "CL", "CN", //
    "CO", "HR", "DK", "DO", "EG", "FI", "FR", "DE", "GR", "HK", //
    "ID", "IE", "IL", "IT", "JP", "JO", "KW", "LB", "MY", "MX", //
    "NL", "NZ", "NG", "NO", "PK", "PA", "PE", "PH", "PL", "RU", //
    "SA", "RS", "SG", "ZA", "KR", "ES", "SE", "CH", "TW", "TH", //
    "TR", "AE", "VE", "PT", "LU", "BG", "CZ", "SI", "IS", "SK", //
    "LT", "TT", "BD", "LK", "KE", "HU", "MA", "CY", "JM", "EC", //
    "RO", "BO", "GT", "CR", "QA", "SV", "HN", "NI", "PY", "UY", //
    "PR", "BA", "PS", "TN", "BH", "VN", "GH", "MU", "UA", "MT", //
    "BS", "MV", "OM", "MK", "LV", "EE", "IQ", "DZ", "AL", "NP", //
    "MO", "ME", "SN", "GE", "BN", "UG", "GP", "BB", "AZ", "TZ", //
    "LY", "MQ", "CM", "BW", "ET", "KZ", "NA", "MG", "NC", "MD", //
    "FJ", "BY", "JE", "GU", "YE", "ZM", "IM", "HT", "KH", "AW", //
    "PF", "AF", "BM", "GY", "AM", "MW", "AG", "RW", "GG", "GM", //
    "FO", "LC", "KY", "BJ", "AD", "GD", "VI", "BZ", "VC", "MN", //
    "MZ", "ML", "AO", "GF", "UZ", "DJ", "BF", "MC", "TG", "GL", //
    "GA", "GI", "CD", "KG", "PG", "BT", "KN", "SZ", "LS", "LA", //
    "LI", "MP", "SR", "SC", "VG", "TC", "DM", "MR", "AX", "SM", //
    "SL", "NE", "CG", "AI", "YT", "CV", "GN", "TM", "BI", "TJ", //
    "VU", "SB", "ER", "WS", "AS", "FK", "GQ", "TO", "KM", "PW", //
    "FM", "CF", "SO", "MH", "VA", "TD", "KI", "ST", "TV", "NR", //
    "RE", "LR", "ZW", "CI", "MM", "AN", "AQ", "BQ", "BV", "IO", //
    "CX", "CC", "CK", "CW", "TF", "GW", "HM", "XK", "MS", "NU", //
    "NF", "PN", "BL", "SH", "MF", "PM", "SX", "GS", "SS", "SJ", //
    "TL", "TK", "UM", "WF", "EH",
];

/// Markets swept once daily in addition to the broad rotation.
pub const TOP_MARKETS: &[&str] = &["US", "GB", "CA", "AU", "DE", "FR", "ES", "MX", "IT", "NL"];
