#![no_main]
use std::cell::RefCell;

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use sqlsplit::{BlockTracking, Classifier, EndMatching, Splitter, SplitterOptions};

const HEADER: usize = 1; // option flags

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

static FRAGMENTS: &[&[u8]] = &[
    b"SELECT 1",
    b"SELECT 'a;b'",
    b"SELECT \"x\\\"y\"",
    b"`weird;name`",
    b";",
    b";;",
    b"$$",
    b"//",
    b"BEGIN",
    b"END",
    b"END IF",
    b"END WHILE",
    b"IF",
    b"IF(",
    b"CASE",
    b"WHEN",
    b"WHILE",
    b"REPEAT",
    b"LOOP",
    b"DO",
    b"CREATE PROCEDURE p()",
    b"DELIMITER $$\n",
    b"DELIMITER ;;\n",
    b"DELIMITER ;\n",
    b"DELIMITER '//'\n",
    b"DELIMITER\n",
    b"\\d //\n",
    b"\\d ;\n",
    b"-- comment\n",
    b"--",
    b"# hash\n",
    b"/* block */",
    b"/*!50003 CREATE*/",
    b"/*",
    b"'",
    b"\"",
    b"`",
    b"\\",
    b"\r\n",
    b"\x0b",
    b"\xff\xfe",
    b"\xe2\x82",
];

static SPACE: &[&[u8]] = &[b" ", b"\t", b"\n", b"\r\n", b""];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// A script stitched together from fragments the splitter treats specially.
#[derive(Debug)]
struct Script(Vec<u8>);

impl<'a> Arbitrary<'a> for Script {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let mut out = Vec::new();
        for _ in 0..u.int_in_range(1..=64)? {
            out.extend_from_slice(u.choose(FRAGMENTS)?);
            out.extend_from_slice(u.choose(SPACE)?);
        }
        Ok(Script(out))
    }
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(4) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x0F);
        let noise: Vec<u8> = with_rng(|rng| {
            let len = rng.random_range(16..=256);
            (0..len).map(|_| rng.random::<u8>()).collect()
        });
        let Ok(script) = Script::arbitrary(&mut Unstructured::new(&noise)) else {
            return fuzzer_mutate(data, size, max_size);
        };
        let len = script.0.len().min(max_size - HEADER);
        data[HEADER..HEADER + len].copy_from_slice(&script.0[..len]);
        HEADER + len
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

fn options(flags: u8) -> SplitterOptions {
    SplitterOptions {
        block_tracking: match flags & 3 {
            0 => BlockTracking::Always,
            1 => BlockTracking::Never,
            _ => BlockTracking::DefaultDelimiter,
        },
        end_matching: if flags & 4 == 0 {
            EndMatching::AnyFrame
        } else {
            EndMatching::BeginOnly
        },
        ..Default::default()
    }
}

fn splitter(data: &[u8]) {
    let Some((&flags, input)) = data.split_first() else {
        return;
    };
    let options = options(flags);

    let Ok(segments) = Splitter::new(options).split(input) else {
        return;
    };

    // Segments tile the input; only trailing whitespace may be left over.
    let mut offset = 0;
    for segment in &segments {
        assert_eq!(segment.span.start, offset, "gap before segment");
        assert!(segment.span.end > segment.span.start, "empty segment");
        offset = segment.span.end;
    }
    assert!(
        input[offset..]
            .iter()
            .all(|&b| b == 0x0b || b.is_ascii_whitespace()),
        "non-whitespace tail dropped"
    );

    if flags & 8 != 0 {
        Classifier::new(options)
            .classify(&segments)
            .expect("classifier accepts what the splitter accepted");
    }
}

fuzz_target!(|data: &[u8]| splitter(data));
