use alloy_primitives::{Address, Bytes, B256};
use alloy_sol_types::SolEvent;

/// A log entry emitted by a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

impl ReceiptLog {
    /// Build the log a contract at `address` would emit for `event`.
    pub fn from_event<E: SolEvent>(address: Address, event: &E) -> Self {
        let log = event.encode_log_data();
        Self {
            address,
            topics: log.topics().to_vec(),
            data: log.data,
        }
    }
}

/// Receipt of a mined transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub status: bool,
    pub logs: Vec<ReceiptLog>,
}

impl TransactionReceipt {
    /// Decode every log matching event `E`, skipping logs that fail to decode.
    pub fn decode_events<E: SolEvent>(&self) -> Vec<E> {
        self.logs
            .iter()
            .filter(|log| log.topics.first() == Some(&E::SIGNATURE_HASH))
            .filter_map(|log| E::decode_raw_log(log.topics.iter().copied(), &log.data).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use alloy_sol_types::sol;

    sol! {
        event Minted(address indexed to, uint256 indexed id, string uri);
        event Burned(uint256 indexed id);
    }

    #[test]
    fn test_decode_events_filters_by_signature() {
        let minted = Minted {
            to: Address::repeat_byte(0x11),
            id: U256::from(7u64),
            uri: "ipfs://Qm/7".to_string(),
        };
        let receipt = TransactionReceipt {
            status: true,
            logs: vec![
                ReceiptLog::from_event(Address::ZERO, &Burned { id: U256::from(1u64) }),
                ReceiptLog::from_event(Address::ZERO, &minted),
            ],
            ..Default::default()
        };

        let decoded = receipt.decode_events::<Minted>();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].id, U256::from(7u64));
        assert_eq!(decoded[0].uri, "ipfs://Qm/7");
    }
}
