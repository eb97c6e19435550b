//! Backup classifier for binary formats missing from the primary database.
//! Answers in the same shape as `file --extension`.

use crate::{ExtensionHinter, UNKNOWN_HINT};

struct Signature {
    offset: usize,
    magic: &'static [u8],
    hint: &'static str,
}

const SIGNATURES: &[Signature] = &[
    Signature {
        offset: 0,
        magic: &[0x4C, 0x00, 0x00, 0x00, 0x01, 0x14, 0x02, 0x00],
        hint: "lnk",
    },
    Signature {
        offset: 0,
        magic: b"ITSF",
        hint: "chm",
    },
    Signature {
        offset: 0,
        magic: &[0xD4, 0xC3, 0xB2, 0xA1],
        hint: "pcap/cap/dmp",
    },
    Signature {
        offset: 0,
        magic: &[0xA1, 0xB2, 0xC3, 0xD4],
        hint: "pcap/cap/dmp",
    },
    Signature {
        offset: 0,
        magic: &[0x0A, 0x0D, 0x0D, 0x0A],
        hint: "pcapng",
    },
    Signature {
        offset: 0,
        magic: b"KDMV",
        hint: "vmdk",
    },
    Signature {
        offset: 0,
        magic: b"conectix",
        hint: "vhd",
    },
    Signature {
        offset: 0,
        magic: &[b'Q', b'F', b'I', 0xFB],
        hint: "qcow2/qcow",
    },
    Signature {
        offset: 0,
        magic: b"IsZ!",
        hint: "isz",
    },
    Signature {
        offset: 0,
        magic: &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1],
        hint: "msi/doc/xls/ppt",
    },
    Signature {
        offset: 0,
        magic: b"PAR2\x00PKT",
        hint: "par2",
    },
    Signature {
        offset: 0x8001,
        magic: b"CD001",
        hint: "iso",
    },
];

pub struct MagicHinter;

impl ExtensionHinter for MagicHinter {
    fn name(&self) -> &str {
        "magic"
    }

    fn hint(&self, bytes: &[u8]) -> String {
        SIGNATURES
            .iter()
            .find(|sig| {
                bytes
                    .get(sig.offset..sig.offset + sig.magic.len())
                    .is_some_and(|window| window == sig.magic)
            })
            .map(|sig| sig.hint)
            .unwrap_or(UNKNOWN_HINT)
            .to_string()
    }
}
