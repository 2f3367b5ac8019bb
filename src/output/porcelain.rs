/// A row of `--porcelain` output. Each implementor fixes its own field order.
pub trait PorcelainRecord {
    fn porcelain_fields(&self) -> Vec<String>;
}

/// One record per line, fields joined with `:`.
///
/// Git forbids `:` in ref names, so branch fields never need escaping. Free
/// text fields must be placed last so consumers can split with a limit.
pub fn format_porcelain(items: &[impl PorcelainRecord]) -> String {
    items
        .iter()
        .map(|item| item.porcelain_fields().join(":") + "\n")
        .collect()
}
