use crate::core::circle::CirclePoint;
use crate::core::fields::qm31::SecureField;
use crate::core::ColumnVec;

/// Row offsets read by a component's constraints, one list per column.
pub type Mask = ColumnVec<Vec<usize>>;

/// Repeats `point` once per mask item. Only valid for masks whose items all sit at offset zero.
pub fn fixed_mask_points(
    mask: &Mask,
    point: CirclePoint<SecureField>,
) -> ColumnVec<Vec<CirclePoint<SecureField>>> {
    assert!(
        mask.iter().flatten().all(|&offset| offset == 0),
        "fixed mask with a shifted item"
    );
    mask.iter()
        .map(|mask_entry| vec![point; mask_entry.len()])
        .collect()
}
