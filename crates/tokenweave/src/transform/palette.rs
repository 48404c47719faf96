//! Fixed color palettes for rendered nodes.
//!
//! Colors are assigned by cyclic index, never by hashing, so the same input
//! order always yields the same colors.

/// Colors of mode nodes
pub(crate) const MODE_PALETTE: [&str; 8] = [
    "#4C78A8", "#F58518", "#54A24B", "#E45756", "#72B7B2", "#EECA3B", "#B279A2", "#FF9DA6",
];

/// Colors of platform nodes
pub(crate) const PLATFORM_PALETTE: [&str; 6] = [
    "#1B9E77", "#D95F02", "#7570B3", "#E7298A", "#66A61E", "#E6AB02",
];

/// Colors of value-type clusters
pub(crate) const CLUSTER_PALETTE: [&str; 6] = [
    "#8DD3C7", "#BEBADA", "#FB8072", "#80B1D3", "#FDB462", "#B3DE69",
];

/// Color of the synthetic aggregate node
pub(crate) const AGGREGATE_COLOR: &str = "#9E9E9E";

/// Graph node colors by node type
pub(crate) const BASE_NODE_COLOR: &str = "#4C78A8";
pub(crate) const ALIAS_NODE_COLOR: &str = "#54A24B";
pub(crate) const CIRCULAR_NODE_COLOR: &str = "#E45756";

/// Pick the color for the `index`-th item of a palette.
pub(crate) fn cyclic(palette: &[&'static str], index: usize) -> &'static str {
    palette[index % palette.len()]
}
