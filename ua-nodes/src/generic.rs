// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

use ua_types::{AddNodeAttributes, NodeClass, NodeId, QualifiedName};

use crate::{
    DataType, FromAttributesError, Method, NodeType, Object, ObjectType, ReferenceType, Variable,
    VariableType, View,
};

/// Create a node of the requested class from an attribute block.
///
/// The block must be the one belonging to `node_class`, or
/// [`FromAttributesError::MismatchedNodeClass`] is returned. An empty block
/// is a mismatch for every class: each class has mandatory attributes.
pub fn new_node_from_attributes(
    node_id: &NodeId,
    browse_name: &QualifiedName,
    node_class: NodeClass,
    node_attributes: AddNodeAttributes,
) -> Result<NodeType, FromAttributesError> {
    let node = match (node_class, node_attributes) {
        (NodeClass::Object, AddNodeAttributes::Object(attrs)) => {
            Object::from_attributes(node_id, browse_name.clone(), attrs)?.into()
        }
        (NodeClass::Variable, AddNodeAttributes::Variable(attrs)) => {
            Variable::from_attributes(node_id, browse_name.clone(), attrs)?.into()
        }
        (NodeClass::Method, AddNodeAttributes::Method(attrs)) => {
            Method::from_attributes(node_id, browse_name.clone(), attrs)?.into()
        }
        (NodeClass::ObjectType, AddNodeAttributes::ObjectType(attrs)) => {
            ObjectType::from_attributes(node_id, browse_name.clone(), attrs)?.into()
        }
        (NodeClass::VariableType, AddNodeAttributes::VariableType(attrs)) => {
            VariableType::from_attributes(node_id, browse_name.clone(), attrs)?.into()
        }
        (NodeClass::ReferenceType, AddNodeAttributes::ReferenceType(attrs)) => {
            ReferenceType::from_attributes(node_id, browse_name.clone(), attrs)?.into()
        }
        (NodeClass::DataType, AddNodeAttributes::DataType(attrs)) => {
            DataType::from_attributes(node_id, browse_name.clone(), attrs)?.into()
        }
        (NodeClass::View, AddNodeAttributes::View(attrs)) => {
            View::from_attributes(node_id, browse_name.clone(), attrs)?.into()
        }
        _ => return Err(FromAttributesError::MismatchedNodeClass),
    };
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::new_node_from_attributes;
    use crate::FromAttributesError;
    use ua_types::{
        AddNodeAttributes, AttributesMask, NodeClass, NodeId, ObjectAttributes, VariableAttributes,
    };

    #[test]
    fn mismatched_attributes_are_rejected() {
        let err = new_node_from_attributes(
            &NodeId::new(1, 1u32),
            &"Test".into(),
            NodeClass::Variable,
            AddNodeAttributes::Object(ObjectAttributes::default()),
        )
        .unwrap_err();
        assert_eq!(err, FromAttributesError::MismatchedNodeClass);
    }

    #[test]
    fn missing_mandatory_values_are_rejected() {
        let attrs = VariableAttributes {
            specified_attributes: AttributesMask::DISPLAY_NAME.bits(),
            display_name: "Test".into(),
            ..Default::default()
        };
        let err = new_node_from_attributes(
            &NodeId::new(1, 1u32),
            &"Test".into(),
            NodeClass::Variable,
            AddNodeAttributes::Variable(attrs),
        )
        .unwrap_err();
        assert_eq!(err, FromAttributesError::MissingMandatoryValues);
    }
}
