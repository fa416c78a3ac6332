use arrayvec::ArrayVec;
use bitframe::{
    describe, from_bytes, from_bytes_at, to_bytes, Directive, Error, Frame, FrameUnion, Layout,
    Specialised, Writer,
};
use bytes::Bytes;
use hex_literal::hex;

#[derive(Clone, Debug, Default, PartialEq, Frame)]
struct MixedEndian {
    #[frame(order = 0, be = 2, fixed = [0x7F, 0x80])]
    start: u16,
    #[frame(order = 1, be = 3)]
    big: u32,
    #[frame(order = 2, le = 3)]
    little: u32,
    #[frame(order = 3, le = 2, fixed = [0xAA, 0x55])]
    end: u16,
}

impl MixedEndian {
    fn sample(big: u32, little: u32) -> Self {
        Self {
            start: 0x7F80,
            big,
            little,
            end: 0xAA55,
        }
    }
}

#[test]
fn mixed_endian_encode() {
    let value = MixedEndian::sample(0x123456, 0x234567);
    let bytes = to_bytes(&value).unwrap();
    assert_eq!(bytes, hex!("7F80123456674523 55AA"));
}

#[test]
fn mixed_endian_round_trip() {
    let value = MixedEndian::sample(0x123456, 0x234567);
    let bytes = to_bytes(&value).unwrap();
    let decoded = from_bytes::<MixedEndian>(&bytes).unwrap();
    assert!(decoded.complete);
    assert_eq!(decoded.value, value);
}

#[test]
fn fixed_values_substitute_the_in_memory_value() {
    // garbage in the fixed fields must not reach the wire
    let value = MixedEndian {
        start: 0xDEAD,
        end: 0xBEEF,
        ..MixedEndian::sample(0x123456, 0x234567)
    };
    assert_eq!(to_bytes(&value).unwrap(), hex!("7F80123456674523 55AA"));
}

#[test]
fn fixed_values_tolerated_on_read() {
    let decoded = from_bytes::<MixedEndian>(&hex!("ABCD123456674523 BCDE")).unwrap();
    assert!(decoded.complete);
    assert_eq!(decoded.value.start, 0xABCD);
    assert_eq!(decoded.value.big, 0x123456);
    assert_eq!(decoded.value.little, 0x234567);
    assert_eq!(decoded.value.end, 0xDEBC);
}

#[test]
fn under_run_reports_and_zero_fills() {
    let decoded = from_bytes::<MixedEndian>(&hex!("7F8012")).unwrap();
    assert!(!decoded.complete);
    assert_eq!(decoded.value.start, 0x7F80);
    assert_eq!(decoded.value.big, 0x120000);
    assert_eq!(decoded.value.little, 0);
    assert_eq!(decoded.value.end, 0);
}

#[test]
fn windowed_decode() {
    let buffer = hex!("FFFF 7F80123456674523 55AA FFFF");
    let decoded = from_bytes_at::<MixedEndian>(&buffer, 2, 10).unwrap();
    assert!(decoded.complete);
    assert_eq!(decoded.value, MixedEndian::sample(0x123456, 0x234567));
}

#[test]
fn layout_metadata_is_ordered() {
    let spec = &<MixedEndian as Layout>::SPEC;
    assert_eq!(spec.name, "MixedEndian");
    assert_eq!(spec.specialise_with, None);
    assert!(spec.fields.windows(2).all(|pair| pair[0].order < pair[1].order));
    assert_eq!(spec.fields[0].directive, Directive::UintBe { bytes: 2 });
    assert_eq!(spec.fields[0].fixed, Some(&[0x7F, 0x80][..]));
    assert_eq!(spec.fields[2].directive, Directive::UintLe { bytes: 3 });
}

#[test]
fn derived_encode_matches_manual() {
    let value = MixedEndian::sample(0x123456, 0x234567);
    let derived = to_bytes(&value).unwrap();

    let mut manual = Writer::new();
    manual.write_uint_be(0x7F80, 2);
    manual.write_uint_be(0x123456, 3);
    manual.write_uint_le(0x234567, 3);
    manual.write_uint_le(0xAA55, 2);

    assert_eq!(derived, manual.finish());
}

#[derive(Clone, Debug, Default, PartialEq, Frame)]
struct Packed {
    #[frame(order = 0, bits = 3)]
    a: u8,
    #[frame(order = 1, bits = 2)]
    b: u8,
    #[frame(order = 2, bits = 3)]
    c: u8,
}

#[test]
fn sub_byte_packing() {
    let value = Packed { a: 2, b: 1, c: 1 };
    let bytes = to_bytes(&value).unwrap();
    assert_eq!(bytes, [0x49]);

    let decoded = from_bytes::<Packed>(&bytes).unwrap();
    assert!(decoded.complete);
    assert_eq!(decoded.value, value);
}

#[derive(Clone, Debug, Default, PartialEq, Frame)]
struct WideBits {
    #[frame(order = 0, bits = 12)]
    hi: u16,
    #[frame(order = 1, bits = 4)]
    lo: u8,
    #[frame(order = 2, be = 1)]
    trailer: u8,
}

#[test]
fn bit_run_wider_than_a_byte() {
    let bytes = hex!("ABCD3C");
    let decoded = from_bytes::<WideBits>(&bytes).unwrap();
    assert!(decoded.complete);
    assert_eq!(decoded.value.hi, 0xABC);
    assert_eq!(decoded.value.lo, 0xD);
    assert_eq!(decoded.value.trailer, 0x3C);
    assert_eq!(to_bytes(&decoded.value).unwrap(), bytes);
}

#[derive(Clone, Debug, Default, PartialEq, Frame)]
struct Batch {
    #[frame(order = 0, be = 1, fixed = [0x55])]
    start: u8,
    #[frame(order = 1, be = 2)]
    how_many: u16,
    #[frame(order = 2, repeat_with = "record_count")]
    records: Vec<MixedEndian>,
    #[frame(order = 3, be = 1, fixed = [0xAA])]
    end: u8,
}

impl Batch {
    fn record_count(&self) -> usize {
        self.how_many as usize
    }
}

#[test]
fn variable_repeat_with_markers() {
    let value = Batch {
        start: 0x55,
        how_many: 3,
        records: vec![
            MixedEndian::sample(0x010203, 0x0A0B0C),
            MixedEndian::sample(0x040506, 0x0D0E0F),
            MixedEndian::sample(0x070809, 0x101112),
        ],
        end: 0xAA,
    };

    let bytes = to_bytes(&value).unwrap();
    assert_eq!(bytes.len(), 34);
    assert_eq!(
        bytes,
        hex!(
            "550003"
            "7F800102030C0B0A55AA"
            "7F800405060F0E0D55AA"
            "7F80070809121110 55AA"
            "AA"
        )
    );

    let decoded = from_bytes::<Batch>(&bytes).unwrap();
    assert!(decoded.complete);
    assert_eq!(decoded.value, value);
}

#[test]
fn repeat_count_must_agree() {
    let value = Batch {
        start: 0x55,
        how_many: 2,
        records: vec![MixedEndian::default(); 3],
        end: 0xAA,
    };
    assert_eq!(
        to_bytes(&value).unwrap_err(),
        Error::CountMismatch {
            field: "records",
            expected: 2,
            actual: 3
        }
    );
}

#[derive(Clone, Debug, Default, PartialEq, Frame)]
struct Triple {
    #[frame(order = 0, repeat = 3)]
    parts: Vec<Packed>,
}

#[test]
fn fixed_repeat_round_trip() {
    let value = Triple {
        parts: vec![
            Packed { a: 1, b: 0, c: 1 },
            Packed { a: 2, b: 1, c: 1 },
            Packed { a: 7, b: 3, c: 7 },
        ],
    };
    let bytes = to_bytes(&value).unwrap();
    assert_eq!(bytes.len(), 3);
    let decoded = from_bytes::<Triple>(&bytes).unwrap();
    assert_eq!(decoded.value, value);

    let short = Triple {
        parts: vec![Packed::default()],
    };
    assert_eq!(
        to_bytes(&short).unwrap_err(),
        Error::CountMismatch {
            field: "parts",
            expected: 3,
            actual: 1
        }
    );
}

#[derive(Clone, Debug, Default, PartialEq, Frame)]
struct Message {
    #[frame(order = 0, be = 2, fixed = [0x12, 0x34])]
    start: u16,
    #[frame(order = 1, until = 0x00)]
    body: Vec<u8>,
    #[frame(order = 2, be = 2, fixed = [0x56, 0x78])]
    end: u16,
}

#[test]
fn terminated_byte_string() {
    let value = Message {
        start: 0x1234,
        body: b"Hello, world!".to_vec(),
        end: 0x5678,
    };
    let bytes = to_bytes(&value).unwrap();
    assert_eq!(bytes, hex!("1234 48656C6C6F2C20776F726C6421 00 5678"));

    let decoded = from_bytes::<Message>(&bytes).unwrap();
    assert!(decoded.complete);
    assert_eq!(decoded.value.body, b"Hello, world!\0");
    assert_eq!(decoded.value.end, 0x5678);
}

#[test]
fn terminator_not_doubled() {
    let value = Message {
        start: 0x1234,
        body: b"hi\0".to_vec(),
        end: 0x5678,
    };
    assert_eq!(to_bytes(&value).unwrap(), hex!("1234 686900 5678"));
}

#[derive(Clone, Debug, Default, PartialEq, Frame)]
struct Clamped {
    #[frame(order = 0, be = 2)]
    declared: u16,
    #[frame(order = 1, bytes_with = "body_len")]
    body: Vec<u8>,
    #[frame(order = 2, be = 1)]
    trailer: u8,
}

impl Clamped {
    fn body_len(&self) -> usize {
        self.declared as usize
    }
}

#[test]
fn variable_length_round_trip() {
    let value = Clamped {
        declared: 3,
        body: vec![0x01, 0x02, 0x03],
        trailer: 0x99,
    };
    let bytes = to_bytes(&value).unwrap();
    assert_eq!(bytes, hex!("0003 010203 99"));
    let decoded = from_bytes::<Clamped>(&bytes).unwrap();
    assert_eq!(decoded.value, value);
}

#[test]
fn variable_length_mismatch_fails_encode() {
    let value = Clamped {
        declared: 3,
        body: vec![0x01, 0x02],
        trailer: 0x99,
    };
    assert_eq!(
        to_bytes(&value).unwrap_err(),
        Error::LengthMismatch {
            field: "body",
            expected: 3,
            actual: 2
        }
    );
}

#[test]
fn over_limit_variable_length_leaves_reader_in_place() {
    // declared length far beyond the safety limit: the body must come back
    // empty and the trailer must decode from the very next byte
    let decoded = from_bytes::<Clamped>(&hex!("FFFF 99")).unwrap();
    assert!(decoded.complete);
    assert_eq!(decoded.value.declared, 0xFFFF);
    assert_eq!(decoded.value.body, Vec::<u8>::new());
    assert_eq!(decoded.value.trailer, 0x99);
}

#[test]
fn zero_variable_length_is_empty() {
    let decoded = from_bytes::<Clamped>(&hex!("0000 99")).unwrap();
    assert!(decoded.complete);
    assert_eq!(decoded.value.body, Vec::<u8>::new());
    assert_eq!(decoded.value.trailer, 0x99);
}

#[derive(Clone, Debug, Default, PartialEq, Frame)]
struct Tagged {
    #[frame(order = 0, ascii = 4)]
    tag: String,
    #[frame(order = 1, tail)]
    rest: Vec<u8>,
}

#[test]
fn ascii_and_tail() {
    let value = Tagged {
        tag: "GOOD".to_string(),
        rest: vec![0xDE, 0xAD],
    };
    let bytes = to_bytes(&value).unwrap();
    assert_eq!(bytes, hex!("474F4F44 DEAD"));

    let decoded = from_bytes::<Tagged>(&bytes).unwrap();
    assert_eq!(decoded.value, value);
}

#[test]
fn ascii_pads_and_truncates_from_the_front() {
    let short = Tagged {
        tag: "AB".to_string(),
        rest: Vec::new(),
    };
    assert_eq!(to_bytes(&short).unwrap(), hex!("00004142"));

    let long = Tagged {
        tag: "TOOLONG".to_string(),
        rest: Vec::new(),
    };
    assert_eq!(to_bytes(&long).unwrap(), hex!("4C4F4E47")); // "LONG"
}

#[test]
fn ascii_replaces_non_ascii_wire_bytes() {
    // one replacement character per byte, even across a UTF-8 sequence
    let decoded = from_bytes::<Tagged>(&hex!("47C3A944")).unwrap();
    assert!(decoded.complete);
    assert_eq!(decoded.value.tag, "G\u{FFFD}\u{FFFD}D");
}

#[derive(Clone, Debug, Default, PartialEq, Frame)]
struct Containers {
    #[frame(order = 0, bytes = 4)]
    raw: Bytes,
    #[frame(order = 1, bytes = 2)]
    pair: ArrayVec<u8, 2>,
}

#[test]
fn alternate_byte_containers() {
    let bytes = hex!("01020304 AABB");
    let decoded = from_bytes::<Containers>(&bytes).unwrap();
    assert!(decoded.complete);
    assert_eq!(decoded.value.raw, Bytes::from_static(&hex!("01020304")));
    assert_eq!(decoded.value.pair.as_slice(), hex!("AABB"));
    assert_eq!(to_bytes(&decoded.value).unwrap(), bytes);
}

#[derive(Clone, Debug, Default, PartialEq, Frame)]
struct SmallTail {
    #[frame(order = 0, be = 1)]
    version: u8,
    #[frame(order = 1, tail)]
    rest: ArrayVec<u8, 2>,
}

#[test]
fn wire_overflow_of_bounded_container_fails_decode() {
    let decoded = from_bytes::<SmallTail>(&hex!("01AABB")).unwrap();
    assert!(decoded.complete);
    assert_eq!(decoded.value.rest.as_slice(), hex!("AABB"));

    assert_eq!(
        from_bytes::<SmallTail>(&hex!("01AABBCC")).unwrap_err(),
        Error::Overflow
    );
}

#[derive(Clone, Debug, Default, PartialEq, Frame)]
#[frame(specialise_with = "classify", output = Parent)]
struct GenericParent {
    #[frame(order = 0, be = 2)]
    type_number: u16,
    #[frame(order = 1, be = 2)]
    generic_data: u16,
}

impl GenericParent {
    fn classify(&self) -> Option<Specialised<Parent>> {
        (self.type_number == 3).then(Specialised::to::<SpecialParent>)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Frame)]
struct SpecialParent {
    #[frame(order = 0, be = 2)]
    type_number: u16,
    #[frame(order = 1, be = 2)]
    generic_data: u16,
    #[frame(order = 2, ascii = 4)]
    fixed_string: String,
}

#[derive(Clone, Debug, PartialEq, FrameUnion)]
enum Parent {
    Generic(GenericParent),
    Special(SpecialParent),
}

#[test]
fn specialiser_rewinds_and_re_decodes() {
    let decoded = from_bytes::<GenericParent>(&hex!("0003 1234 474F4F44")).unwrap();
    assert!(decoded.complete);
    assert_eq!(
        decoded.value,
        Parent::Special(SpecialParent {
            type_number: 3,
            generic_data: 0x1234,
            fixed_string: "GOOD".to_string(),
        })
    );
}

#[test]
fn specialiser_keeps_the_base_when_unmatched() {
    let decoded = from_bytes::<GenericParent>(&hex!("0002 1234")).unwrap();
    assert!(decoded.complete);
    assert_eq!(
        decoded.value,
        Parent::Generic(GenericParent {
            type_number: 2,
            generic_data: 0x1234,
        })
    );
}

#[test]
fn specialised_output_encodes_back() {
    let decoded = from_bytes::<GenericParent>(&hex!("0003 1234 474F4F44")).unwrap();
    assert_eq!(to_bytes(&decoded.value).unwrap(), hex!("0003 1234 474F4F44"));
}

#[derive(Clone, Debug, Default, PartialEq, Frame)]
struct Envelope {
    #[frame(order = 0, be = 1)]
    version: u8,
    #[frame(order = 1, child = GenericParent)]
    payload: Parent,
}

impl Default for Parent {
    fn default() -> Self {
        Parent::Generic(GenericParent::default())
    }
}

#[test]
fn child_fields_specialise_too() {
    let decoded = from_bytes::<Envelope>(&hex!("01 0003 1234 474F4F44")).unwrap();
    assert!(decoded.complete);
    assert_eq!(decoded.value.version, 1);
    assert!(matches!(decoded.value.payload, Parent::Special(_)));
}

#[derive(Clone, Debug, Default, PartialEq, Frame)]
#[frame(specialise_with = "reroll", output = Rerolled)]
struct Rerolling {
    #[frame(order = 0, be = 1)]
    tag: u8,
}

impl Rerolling {
    fn reroll(&self) -> Option<Specialised<Rerolled>> {
        Some(Specialised::to::<Rerolling>())
    }
}

#[derive(Clone, Debug, PartialEq, FrameUnion)]
enum Rerolled {
    Rerolling(Rerolling),
}

#[test]
fn specialisation_recursion_is_bounded() {
    assert_eq!(
        from_bytes::<Rerolling>(&hex!("01")).unwrap_err(),
        Error::SpecialiseDepth
    );
}

#[test]
fn length_determinism() {
    let batch = Batch {
        start: 0x55,
        how_many: 2,
        records: vec![
            MixedEndian::sample(1, 2),
            MixedEndian::sample(3, 4),
        ],
        end: 0xAA,
    };
    // 1 + 2 + 2 * (2 + 3 + 3 + 2) + 1
    assert_eq!(to_bytes(&batch).unwrap().len(), 24);
}

#[test]
fn describe_renders_a_tree() {
    let batch = Batch {
        start: 0x55,
        how_many: 1,
        records: vec![MixedEndian::sample(0x123456, 0x234567)],
        end: 0xAA,
    };
    assert_eq!(
        describe(&batch),
        "start: 0x55 (85)\n\
         how_many: 0x0001 (1)\n\
         records[0]:\n\
         \x20 start: 0x7F80 (32640)\n\
         \x20 big: 0x00123456 (1193046)\n\
         \x20 little: 0x00234567 (2311527)\n\
         \x20 end: 0xAA55 (43605)\n\
         end: 0xAA (170)\n"
    );
}

#[test]
fn describe_quotes_strings_and_hexes_arrays() {
    let value = Tagged {
        tag: "GOOD".to_string(),
        rest: vec![0xDE, 0xAD],
    };
    assert_eq!(describe(&value), "tag: \"GOOD\"\nrest: 0x[DEAD]\n");
}
