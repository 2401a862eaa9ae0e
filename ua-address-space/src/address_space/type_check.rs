//! Structural validation of Variable and VariableType nodes against their
//! variable type template: data type subtyping, value rank and array
//! dimension compatibility, and value coercion.

use log::warn;
use ua_nodes::{NodeType, TypeTree, ValueSource};
use ua_types::{
    DataTypeId, DataValue, NodeClass, NodeId, StatusCode, VariableTypeId, Variant,
    VariantScalarTypeId,
};

use super::AddressSpace;

/// Whether a declared value rank agrees with a declared number of array
/// dimensions. Scalar-like ranks take no dimensions, a fixed positive rank
/// must match the dimension count exactly, and rank 0 (one or more
/// dimensions) leaves the count open.
pub fn compatible_value_rank_array_dimensions(value_rank: i32, dimensions_count: usize) -> bool {
    match value_rank {
        -3 | -2 | -1 => dimensions_count == 0,
        0 => true,
        rank if rank > 0 => dimensions_count == rank as usize,
        _ => false,
    }
}

/// Whether a child value rank is within the constraint of its parent's.
/// -3 (any) admits everything, -2 (scalar or array) admits every concrete
/// shape, -1 (scalar) and positive ranks admit only themselves, and 0
/// admits any array rank.
pub fn compatible_value_ranks(child: i32, parent: i32) -> bool {
    match parent {
        -3 => true,
        -2 => child == -2 || child == -1 || child >= 0,
        -1 => child == -1,
        0 => child >= 0,
        rank if rank > 0 => child == rank,
        _ => false,
    }
}

/// Whether child array dimensions satisfy the parent's template: same
/// number of dimensions, and each parent dimension either matches or is 0,
/// meaning unconstrained.
pub fn compatible_array_dimensions(child: &[u32], parent: &[u32]) -> bool {
    if child.len() != parent.len() {
        return false;
    }
    child
        .iter()
        .zip(parent.iter())
        .all(|(c, p)| *p == 0 || c == p)
}

/// Whether an actual value agrees with a declared value rank.
fn compatible_value_rank_value(value_rank: i32, value: &Variant) -> bool {
    match value_rank {
        -3 | -2 => true,
        -1 => !value.is_array(),
        0 => value.is_array(),
        rank if rank > 0 => value
            .array_dimensions()
            .map(|d| d.len() == rank as usize)
            .unwrap_or(false),
        _ => false,
    }
}

/// Run the class-appropriate structural check for a freshly added node.
/// Variables are checked against their type definition, variable types
/// against their supertype. Other classes have nothing to check.
pub(crate) fn type_check_node(
    space: &mut AddressSpace,
    node_id: &NodeId,
    node_class: NodeClass,
    type_definition: Option<&NodeId>,
    parent: Option<&NodeId>,
) -> Result<(), StatusCode> {
    match node_class {
        NodeClass::Variable => {
            let Some(vt) = type_definition else {
                return Err(StatusCode::BadTypeDefinitionInvalid);
            };
            type_check_variable(space, node_id, vt)
        }
        NodeClass::VariableType => {
            let Some(supertype) = parent else {
                return Err(StatusCode::BadParentNodeIdInvalid);
            };
            type_check_variable(space, node_id, supertype)
        }
        _ => Ok(()),
    }
}

/// Check the variable-ish node `node_id` against the variable type
/// `vt_id`. On success the node may have been repaired: missing data type,
/// missing value and a value rank of 0 are all filled in from the value or
/// the template.
pub(crate) fn type_check_variable(
    space: &mut AddressSpace,
    node_id: &NodeId,
    vt_id: &NodeId,
) -> Result<(), StatusCode> {
    // The root of the data variable hierarchy is checked against nothing.
    if *node_id == VariableTypeId::BaseDataVariableType {
        return Ok(());
    }

    let (is_variable, mut data_type, mut value_rank, array_dimensions) = match space.find(node_id) {
        Some(NodeType::Variable(v)) => (
            true,
            v.data_type().clone(),
            v.value_rank(),
            v.array_dimensions(),
        ),
        Some(NodeType::VariableType(v)) => (
            false,
            v.data_type().clone(),
            v.value_rank(),
            v.array_dimensions(),
        ),
        Some(_) => return Err(StatusCode::BadNodeClassInvalid),
        None => return Err(StatusCode::BadNodeIdUnknown),
    };

    // A missing data type is repaired rather than rejected, to keep
    // imported nodesets with sloppy variables working.
    if data_type.is_null() {
        warn!(
            "Variable {} has no data type, defaulting to BaseDataType",
            node_id
        );
        data_type = DataTypeId::BaseDataType.into();
        set_data_type(space, node_id, &data_type)?;
    }

    let Some(NodeType::VariableType(vt)) = space.find(vt_id) else {
        return Err(StatusCode::BadTypeDefinitionInvalid);
    };
    if vt.is_abstract() && is_variable {
        return Err(StatusCode::BadTypeDefinitionInvalid);
    }
    let vt_data_type = vt.data_type().clone();
    let vt_value_rank = vt.value_rank();
    let vt_array_dimensions = vt.array_dimensions();

    if !space.is_subtype_of(&data_type, &vt_data_type) {
        return Err(StatusCode::BadTypeMismatch);
    }

    // Read the current value through the node's normal read path, so a
    // registered data source is consulted.
    let value = match space.find(node_id) {
        Some(NodeType::Variable(v)) => v.read_value()?,
        Some(NodeType::VariableType(v)) => v.value().cloned().unwrap_or_default(),
        _ => return Err(StatusCode::BadNodeIdUnknown),
    };
    let mut value_variant = value.value.unwrap_or_default();

    // An empty value of a concrete builtin type gets a synthesized null
    // value, written back through the normal write path.
    if value_variant.is_empty() {
        if let Some(scalar_type) = VariantScalarTypeId::from_data_type(&data_type) {
            let null_value = if value_rank == 1 {
                Variant::empty_array(scalar_type)
            } else {
                Variant::null_scalar(scalar_type)
            };
            write_value_back(space, node_id, DataValue::new_now(null_value.clone()))?;
            value_variant = null_value;
        }
    }

    // A scalar value on a node that never declared a rank adopts the rank
    // of the template.
    let dimensions_count = array_dimensions.as_ref().map(|d| d.len()).unwrap_or(0);
    if dimensions_count == 0
        && !value_variant.is_empty()
        && !value_variant.is_array()
        && value_rank == 0
    {
        value_rank = vt_value_rank;
        set_value_rank(space, node_id, value_rank)?;
    }

    if !compatible_value_rank_array_dimensions(value_rank, dimensions_count) {
        return Err(StatusCode::BadTypeMismatch);
    }
    if !compatible_value_ranks(value_rank, vt_value_rank) {
        return Err(StatusCode::BadTypeMismatch);
    }
    if let (Some(dimensions), Some(vt_dimensions)) = (&array_dimensions, &vt_array_dimensions) {
        if !compatible_array_dimensions(dimensions, vt_dimensions) {
            return Err(StatusCode::BadTypeMismatch);
        }
    }
    if !value_variant.is_empty() {
        if !compatible_value_rank_value(value_rank, &value_variant) {
            return Err(StatusCode::BadTypeMismatch);
        }
        if let (Some(value_dimensions), Some(dimensions)) =
            (value_variant.array_dimensions(), &array_dimensions)
        {
            if !compatible_array_dimensions(&value_dimensions, dimensions) {
                return Err(StatusCode::BadTypeMismatch);
            }
        }

        type_check_value(space, node_id, &data_type, value_variant, is_variable)?;
    }

    Ok(())
}

/// Coerce an inline value to the node's declared data type. Values from a
/// data source are not rewritten, external storage is authoritative.
fn type_check_value(
    space: &mut AddressSpace,
    node_id: &NodeId,
    declared: &NodeId,
    value: Variant,
    is_variable: bool,
) -> Result<(), StatusCode> {
    if is_variable {
        if let Some(NodeType::Variable(v)) = space.find(node_id) {
            if v.value_source() == ValueSource::DataSource {
                return Ok(());
            }
        }
    }
    let Some(value_type) = value.value_type_id() else {
        return Ok(());
    };
    let value_data_type: NodeId = value_type.data_type_id().into();
    if space.is_subtype_of(&value_data_type, declared) {
        return Ok(());
    }
    let Some(declared_scalar) = VariantScalarTypeId::from_data_type(declared) else {
        return Err(StatusCode::BadTypeMismatch);
    };
    let cast = value.cast(declared_scalar);
    if cast.is_empty() {
        return Err(StatusCode::BadTypeMismatch);
    }
    write_value_back(space, node_id, DataValue::new_now(cast))
}

fn set_data_type(
    space: &mut AddressSpace,
    node_id: &NodeId,
    data_type: &NodeId,
) -> Result<(), StatusCode> {
    match space.find_mut(node_id) {
        Some(NodeType::Variable(v)) => {
            v.set_data_type(data_type.clone());
            Ok(())
        }
        Some(NodeType::VariableType(v)) => {
            v.set_data_type(data_type.clone());
            Ok(())
        }
        _ => Err(StatusCode::BadNodeIdUnknown),
    }
}

fn set_value_rank(
    space: &mut AddressSpace,
    node_id: &NodeId,
    value_rank: i32,
) -> Result<(), StatusCode> {
    match space.find_mut(node_id) {
        Some(NodeType::Variable(v)) => {
            v.set_value_rank(value_rank);
            Ok(())
        }
        Some(NodeType::VariableType(v)) => {
            v.set_value_rank(value_rank);
            Ok(())
        }
        _ => Err(StatusCode::BadNodeIdUnknown),
    }
}

fn write_value_back(
    space: &mut AddressSpace,
    node_id: &NodeId,
    value: DataValue,
) -> Result<(), StatusCode> {
    match space.find_mut(node_id) {
        Some(NodeType::Variable(v)) => v.write_value(value),
        Some(NodeType::VariableType(v)) => {
            v.set_data_value(value);
            Ok(())
        }
        _ => Err(StatusCode::BadNodeIdUnknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_rank_vs_dimensions() {
        assert!(compatible_value_rank_array_dimensions(-1, 0));
        assert!(compatible_value_rank_array_dimensions(-2, 0));
        assert!(compatible_value_rank_array_dimensions(-3, 0));
        assert!(!compatible_value_rank_array_dimensions(-1, 1));
        assert!(compatible_value_rank_array_dimensions(0, 0));
        assert!(compatible_value_rank_array_dimensions(0, 3));
        assert!(compatible_value_rank_array_dimensions(2, 2));
        assert!(!compatible_value_rank_array_dimensions(2, 1));
    }

    #[test]
    fn value_rank_lattice() {
        // any admits everything
        for child in [-3, -2, -1, 0, 1, 5] {
            assert!(compatible_value_ranks(child, -3));
        }
        // scalar or array admits every concrete shape
        assert!(compatible_value_ranks(-1, -2));
        assert!(compatible_value_ranks(0, -2));
        assert!(compatible_value_ranks(2, -2));
        assert!(!compatible_value_ranks(-3, -2));
        // scalar admits only scalar
        assert!(compatible_value_ranks(-1, -1));
        assert!(!compatible_value_ranks(0, -1));
        assert!(!compatible_value_ranks(1, -1));
        // one or more dimensions admits any array rank
        assert!(compatible_value_ranks(0, 0));
        assert!(compatible_value_ranks(3, 0));
        assert!(!compatible_value_ranks(-1, 0));
        // a fixed rank admits only itself
        assert!(compatible_value_ranks(2, 2));
        assert!(!compatible_value_ranks(1, 2));
        assert!(!compatible_value_ranks(-2, 2));
    }

    #[test]
    fn array_dimension_templates() {
        assert!(compatible_array_dimensions(&[2, 3], &[2, 3]));
        assert!(compatible_array_dimensions(&[2, 3], &[0, 3]));
        assert!(compatible_array_dimensions(&[2, 3], &[0, 0]));
        assert!(!compatible_array_dimensions(&[2, 3], &[3, 3]));
        assert!(!compatible_array_dimensions(&[2], &[2, 3]));
    }

    #[test]
    fn value_shape_vs_rank() {
        let scalar = Variant::Int32(1);
        let array = Variant::empty_array(VariantScalarTypeId::Int32);
        assert!(compatible_value_rank_value(-1, &scalar));
        assert!(!compatible_value_rank_value(-1, &array));
        assert!(compatible_value_rank_value(0, &array));
        assert!(!compatible_value_rank_value(0, &scalar));
        assert!(compatible_value_rank_value(-2, &scalar));
        assert!(compatible_value_rank_value(-2, &array));
        assert!(compatible_value_rank_value(1, &array));
        assert!(!compatible_value_rank_value(2, &array));
    }
}
