use std::fmt;

/// The three walker implementations a `clone-data` run can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkerKind {
    TableWalker,
    DataWalkerSync,
    DataWalkerAsync,
}

/// The four writer implementations a `clone-data` run can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterKind {
    ToFile,
    SingleDataViaFdwSync,
    BatchOfDataViaFdwSync,
    ViaFdwAsync,
}

impl fmt::Display for WalkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WalkerKind::TableWalker => "table_walker",
            WalkerKind::DataWalkerSync => "data_walker_sync",
            WalkerKind::DataWalkerAsync => "data_walker_async",
        };
        f.write_str(s)
    }
}

impl fmt::Display for WriterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WriterKind::ToFile => "to_file",
            WriterKind::SingleDataViaFdwSync => "single_data_via_FDW_sync",
            WriterKind::BatchOfDataViaFdwSync => "batch_of_data_via_FDW_sync",
            WriterKind::ViaFdwAsync => "via_FDW_async",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for WalkerKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "table_walker" => Ok(WalkerKind::TableWalker),
            "data_walker_sync" => Ok(WalkerKind::DataWalkerSync),
            "data_walker_async" => Ok(WalkerKind::DataWalkerAsync),
            other => Err(format!("unknown walker '{other}'")),
        }
    }
}

impl std::str::FromStr for WriterKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "to_file" => Ok(WriterKind::ToFile),
            "single_data_via_FDW_sync" => Ok(WriterKind::SingleDataViaFdwSync),
            "batch_of_data_via_FDW_sync" => Ok(WriterKind::BatchOfDataViaFdwSync),
            "via_FDW_async" => Ok(WriterKind::ViaFdwAsync),
            other => Err(format!("unknown writer '{other}'")),
        }
    }
}

/// The compatibility matrix from spec §4.6: which (walker, writer) pairs are a valid
/// combination. `TableWalker` only ever calls `write_table`/`write_edge`, so it's only
/// compatible with the batched writer; the two row-level walkers only ever call
/// `write_table`/`write_node`, so they're compatible with every writer except the
/// batched one.
const COMPATIBILITY_MATRIX: &[(WalkerKind, WriterKind)] = &[
    (WalkerKind::TableWalker, WriterKind::BatchOfDataViaFdwSync),
    (WalkerKind::DataWalkerSync, WriterKind::ToFile),
    (WalkerKind::DataWalkerSync, WriterKind::SingleDataViaFdwSync),
    (WalkerKind::DataWalkerSync, WriterKind::ViaFdwAsync),
    (WalkerKind::DataWalkerAsync, WriterKind::ToFile),
    (WalkerKind::DataWalkerAsync, WriterKind::SingleDataViaFdwSync),
    (WalkerKind::DataWalkerAsync, WriterKind::ViaFdwAsync),
];

pub fn is_compatible(walker: WalkerKind, writer: WriterKind) -> bool {
    COMPATIBILITY_MATRIX.contains(&(walker, writer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_walker_is_only_compatible_with_the_batch_writer() {
        assert!(is_compatible(WalkerKind::TableWalker, WriterKind::BatchOfDataViaFdwSync));
        assert!(!is_compatible(WalkerKind::TableWalker, WriterKind::ToFile));
        assert!(!is_compatible(WalkerKind::TableWalker, WriterKind::SingleDataViaFdwSync));
        assert!(!is_compatible(WalkerKind::TableWalker, WriterKind::ViaFdwAsync));
    }

    #[test]
    fn row_walkers_are_incompatible_with_the_batch_writer() {
        assert!(!is_compatible(WalkerKind::DataWalkerSync, WriterKind::BatchOfDataViaFdwSync));
        assert!(!is_compatible(WalkerKind::DataWalkerAsync, WriterKind::BatchOfDataViaFdwSync));
    }

    #[test]
    fn row_walkers_accept_every_other_writer() {
        for walker in [WalkerKind::DataWalkerSync, WalkerKind::DataWalkerAsync] {
            for writer in [WriterKind::ToFile, WriterKind::SingleDataViaFdwSync, WriterKind::ViaFdwAsync] {
                assert!(is_compatible(walker, writer));
            }
        }
    }

    #[test]
    fn walker_kind_round_trips_through_its_string_form() {
        for walker in [WalkerKind::TableWalker, WalkerKind::DataWalkerSync, WalkerKind::DataWalkerAsync] {
            let parsed: WalkerKind = walker.to_string().parse().unwrap();
            assert_eq!(parsed, walker);
        }
    }
}
