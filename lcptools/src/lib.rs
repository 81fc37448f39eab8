//! Locally consistent parsing of nucleotide sequences.
//!
//! A sequence is cut into *cores*, short factors whose identification only
//! depends on the symbols inside of them. Cores of one level are parsed
//! again to obtain the next, coarser level.
//!
//! ```
//! use lcptools::lps::Lps;
//!
//! let mut lps = Lps::new(b"GGGACCTGGTGACCCCAGCCCACGACAGCCAAGCGCCAGCTGAGCTCAGG").unwrap();
//! assert_eq!(lps.level(), 1);
//!
//! assert!(lps.deepen());
//! assert_eq!(lps.level(), 2);
//! ```

pub mod alphabet;
pub mod core;
pub mod error;
pub mod fasta;
pub mod hash;
pub mod lcpt;
pub mod lps;
pub mod parser;
pub mod progress;
pub mod segment;

#[doc(hidden)]
pub mod _internal_test_data;
