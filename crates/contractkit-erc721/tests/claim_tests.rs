use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use contractkit::{ContractInterface, ContractWrapper, ReceiptLog, SdkError, NATIVE_TOKEN_ADDRESS};
use contractkit_common::{NftMetadataInput, NftMetadataOrUri, UploadOptions, UploadProgress};
use contractkit_erc721::abi::{ClaimCondition, IClaimableERC721, IDrop, IERC721Supply, ILazyMint};
use contractkit_erc721::{ClaimConditionInput, ClaimOptions, Erc721};
use contractkit_test_utils::{MemoryStorage, MockTransport};

const LAZY_MINT: &str = "lazyMint(uint256,string,bytes)";
const PLAIN_CLAIM: &str = "claim(address,uint256)";
const LEGACY_CONDITIONS_CLAIM: &str = "claim(address,uint256,address,uint256,bytes32[],uint256)";
const DROP: &[&str] = &[
    "claim(address,uint256,address,uint256,(bytes32[],uint256,uint256,address),bytes)",
    "getActiveClaimConditionId()",
    "getClaimConditionById(uint256)",
    "claimCondition()",
    "setClaimConditions((uint256,uint256,uint256,uint256,bytes32,uint256,address,string)[],bool)",
];

fn contract_address() -> Address {
    Address::repeat_byte(0x42)
}

fn setup(signatures: &[&str]) -> (Erc721, Arc<MockTransport>, Arc<MemoryStorage>) {
    let transport = MockTransport::new().into_arc();
    let storage = Arc::new(MemoryStorage::new());
    let interface = ContractInterface::from_signatures(
        ["tokenURI(uint256)", "ownerOf(uint256)", "nextTokenIdToMint()"]
            .iter()
            .chain(signatures),
    );
    let contract = ContractWrapper::new(contract_address(), interface, transport.clone());
    (Erc721::new(contract, storage.clone()), transport, storage)
}

fn drop_signatures() -> Vec<&'static str> {
    let mut signatures = vec![LAZY_MINT, PLAIN_CLAIM];
    signatures.extend_from_slice(DROP);
    signatures
}

fn condition(price: u64, currency: Address) -> ClaimCondition {
    ClaimCondition {
        startTimestamp: U256::ZERO,
        maxClaimableSupply: U256::from(100u64),
        supplyClaimed: U256::from(10u64),
        quantityLimitPerWallet: U256::from(5u64),
        merkleRoot: B256::ZERO,
        pricePerToken: U256::from(price),
        currency,
        metadata: String::new(),
    }
}

#[tokio::test]
async fn test_claim_prefers_conditions_and_pays_native_price() {
    let (nft, transport, _) = setup(&drop_signatures());
    let destination = Address::repeat_byte(0x33);
    transport
        .respond::<IDrop::getActiveClaimConditionIdCall>(U256::ZERO)
        .respond::<IDrop::getClaimConditionByIdCall>(condition(1_000, NATIVE_TOKEN_ADDRESS))
        .emit_on::<IDrop::claimCall>(vec![ReceiptLog::from_event(
            contract_address(),
            &IDrop::TokensClaimed {
                claimConditionIndex: U256::ZERO,
                claimer: transport.signer().address(),
                receiver: destination,
                startTokenId: U256::from(10u64),
                quantityClaimed: U256::from(3u64),
            },
        )]);

    let results = nft
        .claim_to(destination, U256::from(3u64), &ClaimOptions::default())
        .await
        .unwrap();
    let ids: Vec<U256> = results.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![U256::from(10u64), U256::from(11u64), U256::from(12u64)]);

    let sent = transport.sent_calls::<IDrop::claimCall>();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, contract_address());
    assert_eq!(sent[0].value, U256::from(3_000u64));
    let call = IDrop::claimCall::abi_decode(&sent[0].data).unwrap();
    assert_eq!(call.receiver, destination);
    assert_eq!(call.currency, NATIVE_TOKEN_ADDRESS);
    assert_eq!(call.pricePerToken, U256::from(1_000u64));
    assert_eq!(call.allowlistProof.pricePerToken, U256::MAX);
    assert!(transport.sent_calls::<IClaimableERC721::claimCall>().is_empty());
}

#[tokio::test]
async fn test_claim_in_erc20_currency_carries_no_value() {
    let (nft, transport, _) = setup(&drop_signatures());
    let currency = Address::repeat_byte(0x55);
    transport
        .respond::<IDrop::getActiveClaimConditionIdCall>(U256::from(1u64))
        .respond::<IDrop::getClaimConditionByIdCall>(condition(1_000, currency));

    let tx = nft
        .get_claim_transaction(Address::repeat_byte(0x33), U256::from(2u64), &ClaimOptions::default())
        .await
        .unwrap();
    assert_eq!(tx.value, U256::ZERO);
    let call = IDrop::claimCall::abi_decode(&tx.data).unwrap();
    assert_eq!(call.currency, currency);

    // preparing a claim never submits it
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_plain_claim_when_conditions_are_absent() {
    let (nft, transport, _) = setup(&[LAZY_MINT, PLAIN_CLAIM]);
    let destination = Address::repeat_byte(0x33);

    let tx = nft
        .get_claim_transaction(destination, U256::from(2u64), &ClaimOptions::default())
        .await
        .unwrap();
    let call = IClaimableERC721::claimCall::abi_decode(&tx.data).unwrap();
    assert_eq!(call.receiver, destination);
    assert_eq!(call.quantity, U256::from(2u64));
    assert_eq!(tx.value, U256::ZERO);
    assert_eq!(transport.request_count(), 0);

    assert!(matches!(
        nft.claim_conditions(),
        Err(SdkError::ExtensionNotImplemented("ERC721ClaimableWithConditions"))
    ));
}

#[tokio::test]
async fn test_legacy_drop_claims_through_conditions() {
    let (nft, transport, _) = setup(&[LAZY_MINT, PLAIN_CLAIM, LEGACY_CONDITIONS_CLAIM]);
    assert!(nft.claim_conditions().is_ok());
    transport
        .respond::<IDrop::getActiveClaimConditionIdCall>(U256::ZERO)
        .respond::<IDrop::getClaimConditionByIdCall>(condition(0, NATIVE_TOKEN_ADDRESS));

    let tx = nft
        .get_claim_transaction(Address::repeat_byte(0x33), U256::from(1u64), &ClaimOptions::default())
        .await
        .unwrap();
    let call = IDrop::claimCall::abi_decode(&tx.data).unwrap();
    assert_eq!(call.quantity, U256::from(1u64));
    assert!(IClaimableERC721::claimCall::abi_decode(&tx.data).is_err());
}

#[tokio::test]
async fn test_claim_rejects_zero_quantity() {
    let (nft, transport, _) = setup(&drop_signatures());

    let err = nft
        .claim(U256::ZERO, &ClaimOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::InvalidInput(_)));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_lazy_mint_numbers_files_from_next_token_id() {
    let (nft, transport, storage) = setup(&[LAZY_MINT, PLAIN_CLAIM]);
    transport
        .respond::<IERC721Supply::nextTokenIdToMintCall>(U256::from(4u64))
        .emit_on::<ILazyMint::lazyMintCall>(vec![ReceiptLog::from_event(
            contract_address(),
            &ILazyMint::TokensLazyMinted {
                startTokenId: U256::from(4u64),
                endTokenId: U256::from(5u64),
                baseURI: "ipfs://QmMemory1/".to_string(),
                encryptedBaseURI: Bytes::new(),
            },
        )]);

    let progress = Arc::new(AtomicUsize::new(0));
    let seen = progress.clone();
    let options = UploadOptions {
        on_progress: Some(Arc::new(move |_: UploadProgress| {
            seen.fetch_add(1, Ordering::SeqCst);
        })),
        ..UploadOptions::default()
    };

    let results = nft
        .lazy_mint(
            &[
                NftMetadataInput::named("Sword").into(),
                NftMetadataInput::named("Shield").into(),
            ],
            options,
        )
        .await
        .unwrap();

    let ids: Vec<U256> = results.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![U256::from(4u64), U256::from(5u64)]);
    assert_eq!(progress.load(Ordering::SeqCst), 2);
    assert_eq!(
        storage.document("ipfs://QmMemory1/5").unwrap()["name"],
        "Shield"
    );

    let sent = transport.sent_calls::<ILazyMint::lazyMintCall>();
    let call = ILazyMint::lazyMintCall::abi_decode(&sent[0].data).unwrap();
    assert_eq!(call.amount, U256::from(2u64));
    assert_eq!(call.baseURIForTokens, "ipfs://QmMemory1/");
    assert!(call.extraData.is_empty());
}

#[tokio::test]
async fn test_lazy_mint_rejects_uris_without_shared_base() {
    let (nft, transport, _) = setup(&[LAZY_MINT]);
    transport.respond::<IERC721Supply::nextTokenIdToMintCall>(U256::ZERO);

    let err = nft
        .lazy_mint(
            &[
                NftMetadataOrUri::from("ipfs://QmOne/0"),
                NftMetadataOrUri::from("ipfs://QmTwo/1"),
            ],
            UploadOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::InvalidInput(_)));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_claim_conditions_round_trip() {
    let (nft, transport, _) = setup(&drop_signatures());
    transport
        .respond::<IDrop::claimConditionCall>((U256::from(1u64), U256::from(2u64)))
        .respond_to(
            &IDrop::getClaimConditionByIdCall {
                conditionId: U256::from(1u64),
            },
            condition(10, NATIVE_TOKEN_ADDRESS),
        )
        .respond_to(
            &IDrop::getClaimConditionByIdCall {
                conditionId: U256::from(2u64),
            },
            condition(20, NATIVE_TOKEN_ADDRESS),
        );

    let conditions = nft.claim_conditions().unwrap();
    let phases = conditions.get_all().await.unwrap();
    let prices: Vec<U256> = phases.iter().map(|p| p.pricePerToken).collect();
    assert_eq!(prices, vec![U256::from(10u64), U256::from(20u64)]);
    assert_eq!(phases[0].available_supply(), U256::from(90u64));

    conditions
        .set(
            vec![
                ClaimConditionInput {
                    start_time: 2_000,
                    price: U256::from(2u64),
                    ..ClaimConditionInput::default()
                },
                ClaimConditionInput {
                    start_time: 1_000,
                    price: U256::from(1u64),
                    ..ClaimConditionInput::default()
                },
            ],
            true,
        )
        .await
        .unwrap();

    let sent = transport.sent_calls::<IDrop::setClaimConditionsCall>();
    let call = IDrop::setClaimConditionsCall::abi_decode(&sent[0].data).unwrap();
    let starts: Vec<U256> = call.phases.iter().map(|p| p.startTimestamp).collect();
    assert_eq!(starts, vec![U256::from(1_000u64), U256::from(2_000u64)]);
    assert!(call.resetClaimEligibility);
}
