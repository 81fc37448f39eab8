use binrw::binrw;

use crate::core::Core;

/// Size of a serialized [`LpsHeader`].
pub(crate) const LPS_HEADER_SIZE: usize = 4 + 8;
/// Size of a serialized [`CoreRecord`].
pub(crate) const CORE_RECORD_SIZE: usize = 4 + 8 + 8;

#[binrw]
#[brw(little)]
#[derive(Debug)]
pub(crate) struct LpsHeader {
    pub level: u32,
    pub core_count: u64,
}

#[binrw]
#[brw(little)]
#[derive(Debug)]
pub(crate) struct CoreRecord {
    pub label: u32,
    pub start: u64,
    pub end: u64,
}

impl From<&Core> for CoreRecord {
    fn from(core: &Core) -> Self {
        Self {
            label: core.label(),
            start: core.start(),
            end: core.end(),
        }
    }
}

impl From<CoreRecord> for Core {
    fn from(record: CoreRecord) -> Self {
        Core::new(record.label, record.start, record.end)
    }
}

/// Tag preceding every item of a `.lcpt` container.
#[binrw]
#[brw(little, repr = u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum LcptItemTag {
    End,
    Lps,
}
