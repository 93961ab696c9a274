use byteorder::{LittleEndian, WriteBytesExt};
use proptest::prelude::*;
use ubx_decode::{
    bits::pow2, is_lnav, CnavMessageType, DecodeError, GnssId, GpsNavMessage, LnavBody,
    LnavPage, LnavPageRecord, LnavSubframe, NavMessage, NavWord, NmctAvailability,
    SchemaRegistry, SfrbxFrame, SvConfig,
};

const GNSS_GPS: u8 = 0;
const GNSS_QZSS: u8 = 5;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn registry() -> SchemaRegistry {
    SchemaRegistry::builder()
        .with_ubx_defaults()
        .expect("default schemas")
        .build()
}

/// RXM-SFRBX payload, version 2
fn sfrbx_payload(gnss_id: u8, sv_id: u8, words: &[u32]) -> Vec<u8> {
    let mut wtr = Vec::with_capacity(8 + 4 * words.len());
    wtr.write_u8(gnss_id).unwrap();
    wtr.write_u8(sv_id).unwrap();
    wtr.write_u8(0).unwrap(); // reserved0
    wtr.write_u8(0).unwrap(); // freqId
    wtr.write_u8(words.len() as u8).unwrap();
    wtr.write_u8(5).unwrap(); // chn
    wtr.write_u8(2).unwrap(); // version
    wtr.write_u8(0).unwrap(); // reserved1
    for w in words {
        wtr.write_u32::<LittleEndian>(*w).unwrap();
    }
    wtr
}

fn interpret(gnss_id: u8, words: &[u32]) -> Result<NavMessage, DecodeError> {
    init_logger();
    let payload = sfrbx_payload(gnss_id, 1, words);
    SfrbxFrame::from_payload(&registry(), &payload)?.interpret()
}

fn lnav(words: &[u32]) -> LnavSubframe {
    match interpret(GNSS_GPS, words) {
        Ok(NavMessage::Gps(GpsNavMessage::Lnav(subframe))) => subframe,
        other => panic!("expected LNAV subframe, got {:?}", other),
    }
}

fn page(body: LnavBody) -> LnavPageRecord {
    match body {
        LnavBody::Subframe4(record) | LnavBody::Subframe5(record) => record,
        other => panic!("expected subframe 4 or 5, got {:?}", other),
    }
}

/// Writes `value` at bits `first..=last` (1-based, MSB first) of 30-bit word `word` (1-based)
fn put(words: &mut [u32; 10], word: usize, first: u32, last: u32, value: i64) {
    let width = last - first + 1;
    let raw = (value as u32) & ((1u32 << width) - 1);
    words[word - 1] |= raw << (30 - last);
}

/// TLM + HOW for `subframe_id`, data words left empty
fn skeleton(subframe_id: u32) -> [u32; 10] {
    let mut words = [0u32; 10];
    put(&mut words, 1, 1, 8, 0x8b);
    put(&mut words, 2, 1, 17, 43_200);
    put(&mut words, 2, 20, 22, subframe_id.into());
    words
}

/// Subframe 4 or 5 page skeleton, data id 1
fn page_skeleton(subframe_id: u32, sv_id: u8) -> [u32; 10] {
    let mut words = skeleton(subframe_id);
    put(&mut words, 3, 1, 2, 1);
    put(&mut words, 3, 3, 8, sv_id.into());
    words
}

const REAL_SUBFRAME1: [u32; 10] = [
    0x22c13e1b, 0x1527c973, 0x13e40004, 0x104f5d31, 0x9744e6d7, 0x07755783, 0x330c80b5,
    0x925042a1, 0x80001684, 0x312c3033,
];

const REAL_SUBFRAME2: [u32; 10] = [
    0x22c13e1b, 0x1527ea1b, 0x127ff165, 0x8c681f7c, 0x02493415, 0xbff8811e, 0x991b8114,
    0x043e686e, 0x83347221, 0x90429f7b,
];

const REAL_SUBFRAME3: [u32; 10] = [
    0x22c13e1b, 0x15280bdb, 0x000aea34, 0x033cffee, 0xbfe5c9eb, 0x136fb64e, 0x86f4ab2c,
    0x0671eb44, 0x3feaf602, 0x92455213,
];

#[test]
fn registry_to_frame() {
    init_logger();
    let payload = sfrbx_payload(GNSS_GPS, 12, &REAL_SUBFRAME1);
    let msg = registry().decode(0x02, 0x13, &payload).unwrap();
    assert_eq!(msg.name(), "RXM-SFRBX");
    assert_eq!(msg.unsigned("numWords").unwrap(), 10);

    let frame = SfrbxFrame::try_from(&msg).unwrap();
    assert_eq!(frame.gnss_id, GnssId::GPS);
    assert_eq!(frame.sv_id, 12);
    assert_eq!(frame.channel, 5);
    assert_eq!(frame.words.len(), 10);
    assert_eq!(frame.words[9], NavWord::new(0x312c3033));
}

#[test]
fn real_clock_subframe() {
    let sf = lnav(&REAL_SUBFRAME1);
    assert_eq!(sf.telemetry.preamble, 0x8b);
    assert_eq!(sf.how.subframe_id, 1);
    assert_eq!(sf.how.tow_s, 259_956);

    let LnavBody::Clock(clock) = sf.body else {
        panic!("expected subframe 1");
    };
    assert_eq!(clock.week, 318);
    assert_eq!(clock.ura, 0);
    assert_eq!(clock.health, 0);
    assert_eq!(clock.iodc, 73);
    assert_eq!(clock.toc_s, 266_400);
    assert_eq!(clock.af2_s_s2, 0.0);
    assert!((clock.af1_s_s - 1.023181539495e-011).abs() < 1e-14);
    assert!((clock.af0_s - -4.524961113930e-004).abs() < 1.0e-11);
}

#[test]
fn real_ephemeris_subframes() {
    let sf = lnav(&REAL_SUBFRAME2);
    let LnavBody::Ephemeris1(eph) = sf.body else {
        panic!("expected subframe 2");
    };
    assert_eq!(eph.iode, 73);
    assert_eq!(eph.toe_s, 266_400);
    assert_eq!(eph.crs_m, -1.843750000000e+000);
    assert!((eph.sqrt_a - 5.153602432251e+003).abs() < 1e-9);
    assert!((eph.m0_semicircles - 9.768415465951e-001).abs() < 1e-9);
    assert!((eph.cuc_rad - -5.587935447693e-008).abs() < 1e-9);
    assert!((eph.e - 8.578718174249e-003).abs() < 1e-9);
    assert!((eph.cus_rad - 8.093193173409e-006).abs() < 1e-9);
    assert!((eph.dn_semicircles_s - 1.444277586415e-009).abs() < 1e-9);
    assert!(!eph.fit_interval_flag);

    let sf = lnav(&REAL_SUBFRAME3);
    let LnavBody::Ephemeris2(eph) = sf.body else {
        panic!("expected subframe 3");
    };
    assert_eq!(eph.iode, 73);
    assert!((eph.cic_rad - 8.009374141693e-008).abs() < 1e-9);
    assert!((eph.cis_rad - -1.955777406693e-007).abs() < 1e-9);
    assert!((eph.crc_m - 2.225625000000e+002).abs() < 1e-9);
    assert!((eph.i0_semicircles - 3.070601043291e-001).abs() < 1e-9);
    assert!((eph.idot_semicircles_s - 1.548414729768e-010).abs() < 1e-9);
    assert!((eph.omega0_semicircles - -6.871047024615e-001).abs() < 1e-9);
    assert!((eph.omega_dot_semicircles_s - -2.449269231874e-009).abs() < 1e-9);
    assert!((eph.omega_semicircles - -6.554632573389e-001).abs() < 1e-9);
}

#[test]
fn synthetic_clock_terms() {
    let mut words = skeleton(1);
    put(&mut words, 3, 1, 10, 1023);
    put(&mut words, 3, 13, 16, 15);
    put(&mut words, 3, 17, 22, 0x3f);
    // IODC 0x2a5: 2 MSBs in word 3, 8 LSBs in word 8
    put(&mut words, 3, 23, 24, 0b10);
    put(&mut words, 8, 1, 8, 0xa5);
    put(&mut words, 4, 1, 1, 1);
    put(&mut words, 7, 17, 24, -3);
    put(&mut words, 8, 9, 24, 0xffff);
    put(&mut words, 9, 1, 8, -1);
    put(&mut words, 9, 9, 24, -32_768);
    put(&mut words, 10, 1, 22, -(1 << 21));

    let sf = lnav(&words);
    let LnavBody::Clock(clock) = sf.body else {
        panic!("expected subframe 1");
    };
    assert_eq!(clock.week, 1023);
    assert_eq!(clock.ura, 15);
    assert_eq!(clock.health, 0x3f);
    assert_eq!(clock.iodc, 0x2a5);
    assert!(clock.l2_p_data_flag);
    assert_eq!(clock.tgd_s, -3.0 * pow2(-31));
    assert_eq!(clock.toc_s, 0xffff * 16);
    assert_eq!(clock.af2_s_s2, -1.0 * pow2(-55));
    assert_eq!(clock.af1_s_s, -32_768.0 * pow2(-43));
    assert_eq!(clock.af0_s, -f64::from(1 << 21) * pow2(-31));
}

#[test]
fn iono_utc_page() {
    let mut words = page_skeleton(4, 56);
    put(&mut words, 3, 9, 16, -1);
    put(&mut words, 3, 17, 24, 1);
    put(&mut words, 4, 1, 8, -128);
    put(&mut words, 4, 9, 16, 2);
    put(&mut words, 4, 17, 24, 127);
    put(&mut words, 5, 1, 8, -2);
    put(&mut words, 5, 9, 16, 3);
    put(&mut words, 6, 1, 24, -1);
    // A0 = -1: 24 MSBs in word 7, 8 LSBs in word 8
    put(&mut words, 7, 1, 24, 0xff_ffff);
    put(&mut words, 8, 1, 8, 0xff);
    put(&mut words, 8, 9, 16, 144);
    put(&mut words, 8, 17, 24, 200);
    put(&mut words, 9, 1, 8, 18);
    put(&mut words, 9, 9, 16, 137);
    put(&mut words, 9, 17, 24, 7);
    put(&mut words, 10, 1, 8, 18);

    let record = page(lnav(&words).body);
    assert_eq!(record.data_id, 1);
    assert_eq!(record.sv_id, 56);
    assert_eq!(record.page, Some(18));
    let LnavPage::IonoUtc(model) = record.content else {
        panic!("expected iono/UTC page, got {:?}", record.content);
    };
    assert_eq!(
        model.alpha,
        [-pow2(-30), pow2(-27), -128.0 * pow2(-24), 2.0 * pow2(-24)]
    );
    assert_eq!(model.beta, [127.0 * pow2(11), -2.0 * pow2(14), 3.0 * pow2(16), 0.0]);
    assert_eq!(model.a1_s_s, -pow2(-50));
    assert_eq!(model.a0_s, -pow2(-30));
    assert_eq!(model.tot_s, 589_824);
    assert_eq!(model.wnt, 200);
    assert_eq!(model.dt_ls_s, 18);
    assert_eq!(model.wn_lsf, 137);
    assert_eq!(model.dn, 7);
    assert_eq!(model.dt_lsf_s, 18);
}

#[test]
fn nmct_page() {
    let mut words = page_skeleton(4, 52);
    put(&mut words, 3, 9, 10, 1);
    put(&mut words, 3, 11, 16, 3);
    put(&mut words, 3, 17, 22, 0b10_0000);
    // ERD 3 = -1 spans words 3 and 4
    put(&mut words, 3, 23, 24, 0b11);
    put(&mut words, 4, 1, 4, 0b1111);
    put(&mut words, 10, 17, 22, 31);

    let record = page(lnav(&words).body);
    assert_eq!(record.page, Some(13));
    let LnavPage::Nmct(nmct) = record.content else {
        panic!("expected NMCT page, got {:?}", record.content);
    };
    assert_eq!(nmct.availability, NmctAvailability::Encrypted);
    assert_eq!(nmct.erd_m[0], Some(3.0 * 0.3));
    assert_eq!(nmct.erd_m[1], None);
    assert_eq!(nmct.erd_m[2], Some(-1.0 * 0.3));
    assert_eq!(nmct.erd_m[3], Some(0.0));
    assert_eq!(nmct.erd_m[29], Some(31.0 * 0.3));
}

#[test]
fn special_message_page() {
    let text = b"GPS SPECIAL MSG TEST!!";
    let mut words = page_skeleton(4, 55);
    for (k, c) in text.iter().enumerate() {
        let (word, first) = match k {
            0..=1 => (3, 9 + 8 * k as u32),
            2..=19 => (4 + (k - 2) / 3, 1 + 8 * ((k - 2) % 3) as u32),
            _ => (10, 1 + 8 * (k - 20) as u32),
        };
        put(&mut words, word, first, first + 7, i64::from(*c));
    }

    let record = page(lnav(&words).body);
    assert_eq!(record.page, Some(17));
    let LnavPage::SpecialMessage(msg) = record.content else {
        panic!("expected special message, got {:?}", record.content);
    };
    assert_eq!(&msg.chars, text);
    assert_eq!(msg.as_str(), Some("GPS SPECIAL MSG TEST!!"));
}

#[test]
fn anti_spoof_and_health_page() {
    let mut words = page_skeleton(4, 63);
    put(&mut words, 3, 9, 12, 0b1001);
    put(&mut words, 8, 13, 16, 0b0010);
    put(&mut words, 8, 19, 24, 0x3f);
    put(&mut words, 10, 13, 18, 0x21);

    let record = page(lnav(&words).body);
    assert_eq!(record.page, Some(25));
    let LnavPage::AntiSpoofHealth(as_page) = record.content else {
        panic!("expected A-S page, got {:?}", record.content);
    };
    assert_eq!(
        as_page.sv_config[0],
        SvConfig {
            anti_spoofing: true,
            config: 1
        }
    );
    assert_eq!(
        as_page.sv_config[31],
        SvConfig {
            anti_spoofing: false,
            config: 2
        }
    );
    assert_eq!(as_page.sv_config[1], SvConfig::default());
    assert_eq!(as_page.sv_health(25), Some(0x3f));
    assert_eq!(as_page.sv_health(32), Some(0x21));
    assert_eq!(as_page.sv_health(24), None);
}

#[test]
fn almanac_page() {
    let mut words = page_skeleton(5, 7);
    put(&mut words, 3, 9, 24, 0x8000);
    put(&mut words, 4, 1, 8, 0x90);
    put(&mut words, 4, 9, 24, -1);
    put(&mut words, 5, 1, 16, -2);
    put(&mut words, 6, 1, 24, 0xa1_0000);
    put(&mut words, 7, 1, 24, 0x80_0000);
    put(&mut words, 8, 1, 24, 1);
    put(&mut words, 9, 1, 24, -1);
    // af0 = -3 (11 bits): 8 MSBs then 3 LSBs around af1
    put(&mut words, 10, 1, 8, 0xff);
    put(&mut words, 10, 20, 22, 0b101);
    put(&mut words, 10, 9, 19, 0x400);

    let record = page(lnav(&words).body);
    assert_eq!(record.page, Some(7));
    let LnavPage::Almanac(alm) = record.content else {
        panic!("expected almanac, got {:?}", record.content);
    };
    assert_eq!(alm.sv_id, 7);
    assert_eq!(alm.e, pow2(-6));
    assert_eq!(alm.toa_s, 589_824);
    assert_eq!(alm.delta_i_semicircles, -pow2(-19));
    assert_eq!(alm.omega_dot_semicircles_s, -2.0 * pow2(-38));
    assert_eq!(alm.health, 0);
    assert_eq!(alm.sqrt_a, f64::from(0xa1_0000) * pow2(-11));
    assert_eq!(alm.omega0_semicircles, -1.0);
    assert_eq!(alm.omega_semicircles, pow2(-23));
    assert_eq!(alm.m0_semicircles, -pow2(-23));
    assert_eq!(alm.af0_s, -3.0 * pow2(-20));
    assert_eq!(alm.af1_s_s, -pow2(-28));
}

#[test]
fn sv_health_page() {
    let mut words = page_skeleton(5, 51);
    put(&mut words, 3, 9, 16, 0x10);
    put(&mut words, 3, 17, 24, 0xcc);
    put(&mut words, 4, 1, 6, 0x01);
    put(&mut words, 9, 19, 24, 0x3e);

    let record = page(lnav(&words).body);
    assert_eq!(record.page, Some(25));
    let LnavPage::SvHealth(health) = record.content else {
        panic!("expected SV health page, got {:?}", record.content);
    };
    assert_eq!(health.toa_s, 65_536);
    assert_eq!(health.wna, 0xcc);
    assert_eq!(health.sv_health(1), Some(0x01));
    assert_eq!(health.sv_health(24), Some(0x3e));
    assert_eq!(health.sv_health(0), None);
}

#[test]
fn dummy_and_reserved_pages() {
    let record = page(lnav(&page_skeleton(4, 0)).body);
    assert_eq!(record.page, None);
    assert_eq!(record.content, LnavPage::Dummy);

    let record = page(lnav(&page_skeleton(5, 0)).body);
    assert_eq!(record.content, LnavPage::Dummy);

    // SV id 57 is broadcast on reserved pages
    let record = page(lnav(&page_skeleton(4, 57)).body);
    assert_eq!(record.page, Some(1));
    assert_eq!(record.content, LnavPage::Reserved);

    // not a subframe 5 SV id
    let record = page(lnav(&page_skeleton(5, 30)).body);
    assert_eq!(record.page, None);
    assert_eq!(record.content, LnavPage::Reserved);
}

#[test]
fn short_lnav_subframe() {
    assert_eq!(
        interpret(GNSS_GPS, &REAL_SUBFRAME1[..6]).unwrap_err(),
        DecodeError::SchemaMismatch {
            message: "GPS LNAV subframe",
            expect: 10,
            got: 6
        }
    );
}

#[test]
fn cnav_words() {
    let word = (0x8b << 24) | (21 << 18) | (10 << 12);
    match interpret(GNSS_GPS, &[word, 0, 0, 0]).unwrap() {
        NavMessage::Gps(GpsNavMessage::Cnav(cnav)) => {
            assert_eq!(cnav.preamble, 0x8b);
            assert_eq!(cnav.prn, 21);
            assert_eq!(cnav.message_type, CnavMessageType::Ephemeris1);
        },
        other => panic!("expected CNAV message, got {:?}", other),
    }
}

#[test]
fn unsupported_constellation() {
    // QZSS LNAV words are left to another decoder
    assert_eq!(
        interpret(GNSS_QZSS, &REAL_SUBFRAME1).unwrap_err(),
        DecodeError::ReservedOrUnsupported {
            what: "gnssId",
            id: GNSS_QZSS
        }
    );
}

#[cfg(feature = "std")]
#[test]
fn process_registry() {
    let payload = sfrbx_payload(GNSS_GPS, 3, &REAL_SUBFRAME2);
    let frame = SfrbxFrame::from_payload(SchemaRegistry::ubx().unwrap(), &payload).unwrap();
    assert!(matches!(
        frame.interpret(),
        Ok(NavMessage::Gps(GpsNavMessage::Lnav(LnavSubframe {
            body: LnavBody::Ephemeris1(_),
            ..
        })))
    ));
}

proptest! {
    #[test]
    fn lnav_cnav_exclusive(first in any::<u32>(), rest in prop::collection::vec(any::<u32>(), 9)) {
        let mut words = vec![first];
        words.extend(rest);
        let expect_lnav = (first >> 22) & 0xff == 0x8b;
        prop_assert_eq!(is_lnav(NavWord::new(first)), expect_lnav);

        match interpret(GNSS_GPS, &words).unwrap() {
            NavMessage::Gps(GpsNavMessage::Lnav(_)) => prop_assert!(expect_lnav),
            NavMessage::Gps(GpsNavMessage::Cnav(cnav)) => {
                prop_assert!(!expect_lnav);
                prop_assert_eq!(cnav.preamble, (first >> 24) as u8);
            },
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }
}
