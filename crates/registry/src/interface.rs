//! Capability introspection.
//!
//! An interface id is four bytes: the XOR of the Keccak-256 selectors of the
//! operations it groups. The registry answers for its own operation set and
//! for the introspection interface itself.

use multipass_crypto::keccak256;

pub type InterfaceId = [u8; 4];

/// Selector of `supportsInterface(bytes4)`.
pub const INTROSPECTION_INTERFACE_ID: InterfaceId = [0x01, 0xff, 0xc9, 0xa7];

const RECORD: &str = "(bytes32,bytes32,bytes32,address,uint256,uint256)";
const QUERY: &str = "(bytes32,bytes32,address,bytes32,bytes32)";

fn operation_signatures() -> Vec<String> {
    vec![
        "initializeDomain(address,uint256,uint256,bytes32,uint256,uint256)".to_string(),
        "activateDomain(bytes32)".to_string(),
        "deactivateDomain(bytes32)".to_string(),
        "changeFee(bytes32,uint256)".to_string(),
        "changeRenewalFee(uint256,bytes32)".to_string(),
        "changeRegistrar(bytes32,address)".to_string(),
        "changeReferralProgram(uint256,uint256,bytes32)".to_string(),
        format!("deleteName({QUERY})"),
        format!("register({RECORD},bytes,{QUERY},bytes)"),
        format!("renewRecord({QUERY},{RECORD},bytes)"),
        "getContractState()".to_string(),
        "getDomainState(bytes32)".to_string(),
        "getDomainStateById(uint256)".to_string(),
        format!("resolveRecord({QUERY})"),
    ]
}

/// First four bytes of the Keccak-256 hash of an operation signature.
pub fn selector(signature: &str) -> InterfaceId {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Interface id of the registry's operation set.
pub fn multipass_interface_id() -> InterfaceId {
    operation_signatures()
        .iter()
        .map(|signature| selector(signature))
        .fold([0u8; 4], |acc, s| {
            [acc[0] ^ s[0], acc[1] ^ s[1], acc[2] ^ s[2], acc[3] ^ s[3]]
        })
}

pub fn supports_interface(interface_id: InterfaceId) -> bool {
    interface_id == INTROSPECTION_INTERFACE_ID || interface_id == multipass_interface_id()
}
