//! End-to-end signing scenarios over a simulated committee, covering
//! the signing testable properties: a full n=5/t=2 round with one
//! corrupted dealing per sharing round, an insufficient-shares failure,
//! and a membership-change scenario where parallel reshares of the same
//! secret over a reduced committee still agree.

use std::collections::BTreeMap;

use tecdsa_core::commitment::{CommitmentOpening, PolynomialCommitment, SimpleCommitment};
use tecdsa_core::curve::{NodeIndex, Point, Scalar};
use tecdsa_core::error::Error;
use tecdsa_core::idkg::{combine_openings, IDkgDealingInternal, IDkgTranscriptInternal, IDkgTranscriptOperation, SecretShares};
use tecdsa_core::key::DerivationPath;
use tecdsa_core::mega::{MEGaPrivateKey, MEGaPublicKey};
use tecdsa_core::seed::Seed;
use tecdsa_core::sign::{derive_rho, ThresholdEcdsaCombinedSigInternal, ThresholdEcdsaSigShareInternal};

const THRESHOLD: usize = 2;

struct Node {
    index: NodeIndex,
    secret_key: MEGaPrivateKey,
    public_key: MEGaPublicKey,
}

fn build_committee(n: u32, seed: &Seed) -> Vec<Node> {
    (0..n)
        .map(|i| {
            let secret_key = MEGaPrivateKey::generate(&seed.derive(&format!("node-{i}")));
            Node {
                index: NodeIndex::new(i),
                public_key: secret_key.public_key(),
                secret_key,
            }
        })
        .collect()
}

fn pedersen_parts(opening: &CommitmentOpening) -> (Scalar, Scalar) {
    match opening {
        CommitmentOpening::Pedersen(v, m) => (*v, *m),
        CommitmentOpening::Simple(_) => panic!("expected a Pedersen opening"),
    }
}

fn simple_part(opening: &CommitmentOpening) -> Scalar {
    match opening {
        CommitmentOpening::Simple(v) => *v,
        CommitmentOpening::Pedersen(_, _) => panic!("expected a Simple opening"),
    }
}

/// Deals from every index in `dealer_indices` (optionally corrupting
/// one so it fails public verification and is dropped, simulating an
/// excluded faulty dealer), combines the surviving dealings into a
/// transcript, and has every node in `nodes` combine its own opening.
#[allow(clippy::too_many_arguments)]
fn run_round(
    name: &str,
    op: &IDkgTranscriptOperation,
    shares_for: impl Fn(NodeIndex) -> SecretShares,
    dealer_indices: &[NodeIndex],
    corrupt_dealer: Option<NodeIndex>,
    nodes: &[Node],
    round_seed: &Seed,
) -> (IDkgTranscriptInternal, BTreeMap<NodeIndex, CommitmentOpening>) {
    let recipients: Vec<MEGaPublicKey> = nodes.iter().map(|n| n.public_key).collect();
    let associated_data = format!("round:{name}").into_bytes();

    let mut dealings = BTreeMap::new();
    for &dealer_index in dealer_indices {
        let shares = shares_for(dealer_index);
        let dealing_seed = round_seed.derive(&format!("dealing-{}", dealer_index.as_u32()));
        let mut dealing = IDkgDealingInternal::new(&shares, &dealing_seed, THRESHOLD, &recipients, dealer_index, &associated_data).unwrap();
        if Some(dealer_index) == corrupt_dealer {
            // Corrupt this dealer's commitment shape so it fails
            // `publicly_verify`'s length check and gets excluded from
            // the verified set, simulating a faulty dealer.
            dealing.commitment = match &dealing.commitment {
                PolynomialCommitment::Simple(c) => PolynomialCommitment::Simple(SimpleCommitment::from_points(
                    c.points().iter().chain(std::iter::once(&Point::generator_g())).copied().collect(),
                )),
                PolynomialCommitment::Pedersen(c) => PolynomialCommitment::Pedersen(tecdsa_core::commitment::PedersenCommitment::from_points(
                    c.points().iter().chain(std::iter::once(&Point::generator_g())).copied().collect(),
                )),
            };
        }
        if dealing.publicly_verify(op, THRESHOLD, dealer_index, recipients.len(), &associated_data).is_ok() {
            dealings.insert(dealer_index, dealing);
        }
    }

    let transcript = IDkgTranscriptInternal::combine_dealings(op, THRESHOLD, &dealings).unwrap();

    let mut openings = BTreeMap::new();
    for node in nodes {
        let mut dealer_openings = BTreeMap::new();
        for (&dealer_index, dealing) in &dealings {
            let opening = dealing
                .decrypt_and_check(&associated_data, dealer_index, node.index, &node.secret_key, &node.public_key)
                .unwrap();
            dealer_openings.insert(dealer_index, opening);
        }
        let opening = combine_openings(&transcript, node.index, THRESHOLD, &dealer_openings).unwrap();
        openings.insert(node.index, opening);
    }

    (transcript, openings)
}

struct RoundOutputs {
    key_transcript: IDkgTranscriptInternal,
    kappa_transcript: IDkgTranscriptInternal,
    lambda_transcript: IDkgTranscriptInternal,
    key_lambda_transcript: IDkgTranscriptInternal,
    kappa_lambda_transcript: IDkgTranscriptInternal,
    lambda_openings: BTreeMap<NodeIndex, CommitmentOpening>,
    key_lambda_openings: BTreeMap<NodeIndex, CommitmentOpening>,
    kappa_lambda_openings: BTreeMap<NodeIndex, CommitmentOpening>,
}

/// Runs a full presignature round: reshares a master key and a fresh
/// kappa secret over `reshare_dealers`, deals a random lambda mask over
/// `all_dealers`, and forms `key*lambda` / `kappa*lambda` over
/// `product_dealers` (the `UnmaskedTimesMasked` minimum-dealer count is
/// `left.len() + right.len() - 1 = 3`, so `product_dealers` must have
/// at least 3 members).
fn run_presignature(
    master_key_secret: Scalar,
    kappa_secret: Scalar,
    nodes: &[Node],
    reshare_dealers: &[NodeIndex],
    all_dealers: &[NodeIndex],
    product_dealers: &[NodeIndex],
    corrupt: [Option<NodeIndex>; 3],
    seed: &Seed,
) -> RoundOutputs {
    let master_key_commitment = PolynomialCommitment::Simple(SimpleCommitment::from_points(vec![Point::mul_by_g(&master_key_secret)]));
    let (key_transcript, key_openings) = run_round(
        "key",
        &IDkgTranscriptOperation::ReshareOfUnmasked(master_key_commitment),
        |_| SecretShares::ReshareOfUnmasked(master_key_secret),
        reshare_dealers,
        corrupt[0],
        nodes,
        &seed.derive("round-key"),
    );

    let kappa_commitment = PolynomialCommitment::Simple(SimpleCommitment::from_points(vec![Point::mul_by_g(&kappa_secret)]));
    let (kappa_transcript, kappa_openings) = run_round(
        "kappa",
        &IDkgTranscriptOperation::ReshareOfUnmasked(kappa_commitment),
        |_| SecretShares::ReshareOfUnmasked(kappa_secret),
        reshare_dealers,
        corrupt[1],
        nodes,
        &seed.derive("round-kappa"),
    );

    let (lambda_transcript, lambda_openings) = run_round(
        "lambda",
        &IDkgTranscriptOperation::Random,
        |_| SecretShares::Random,
        all_dealers,
        corrupt[2],
        nodes,
        &seed.derive("round-lambda"),
    );

    let (key_lambda_transcript, key_lambda_openings) = run_round(
        "key-lambda",
        &IDkgTranscriptOperation::UnmaskedTimesMasked(
            key_transcript.combined_commitment.inner().clone(),
            lambda_transcript.combined_commitment.inner().clone(),
        ),
        |dealer| {
            let left = simple_part(&key_openings[&dealer]);
            let (right_value, right_mask) = pedersen_parts(&lambda_openings[&dealer]);
            SecretShares::UnmaskedTimesMasked { left, right_value, right_mask }
        },
        product_dealers,
        None,
        nodes,
        &seed.derive("round-key-lambda"),
    );

    let (kappa_lambda_transcript, kappa_lambda_openings) = run_round(
        "kappa-lambda",
        &IDkgTranscriptOperation::UnmaskedTimesMasked(
            kappa_transcript.combined_commitment.inner().clone(),
            lambda_transcript.combined_commitment.inner().clone(),
        ),
        |dealer| {
            let left = simple_part(&kappa_openings[&dealer]);
            let (right_value, right_mask) = pedersen_parts(&lambda_openings[&dealer]);
            SecretShares::UnmaskedTimesMasked { left, right_value, right_mask }
        },
        product_dealers,
        None,
        nodes,
        &seed.derive("round-kappa-lambda"),
    );

    RoundOutputs {
        key_transcript,
        kappa_transcript,
        lambda_transcript,
        key_lambda_transcript,
        kappa_lambda_transcript,
        lambda_openings,
        key_lambda_openings,
        kappa_lambda_openings,
    }
}

/// A full end-to-end round: n=5, t=2, one corrupted dealing in each of
/// the key/kappa/lambda sharing rounds, and a signature that verifies
/// given >= t valid shares.
#[test]
fn n5_t2_end_to_end_signing_with_one_corrupted_dealing_per_round() {
    let master_seed = Seed::new("n5-t2-master-seed", b"signing scenario").unwrap();
    let nodes = build_committee(5, &master_seed);
    let all_indices: Vec<NodeIndex> = nodes.iter().map(|n| n.index).collect();
    let reshare_dealers = &all_indices[..3];
    let product_dealers = &all_indices[..3];

    let out = run_presignature(
        Scalar::from_u64(0xabcdef),
        Scalar::from_u64(0x123456),
        &nodes,
        reshare_dealers,
        &all_indices,
        product_dealers,
        [Some(reshare_dealers[0]), Some(reshare_dealers[1]), Some(all_indices[3])],
        &master_seed.derive("presig"),
    );

    let derivation_path = DerivationPath::new_bip32(&[1, 2, 3]);
    let hashed_message = [0x11u8; 32];
    let randomness = b"a 32-byte beacon output.........";

    let signers = &all_indices[..THRESHOLD];
    let mut shares = BTreeMap::new();
    for &signer in signers {
        let share = ThresholdEcdsaSigShareInternal::new(
            &derivation_path,
            &hashed_message,
            randomness,
            &out.key_transcript,
            &out.kappa_transcript,
            &out.lambda_openings[&signer],
            &out.key_lambda_openings[&signer],
            &out.kappa_lambda_openings[&signer],
        )
        .unwrap();
        share
            .verify(
                &derivation_path,
                &hashed_message,
                randomness,
                signer,
                &out.key_transcript,
                &out.kappa_transcript,
                &out.lambda_transcript,
                &out.key_lambda_transcript,
                &out.kappa_lambda_transcript,
            )
            .unwrap();
        shares.insert(signer, share);
    }

    let randomizer = derive_rho(&hashed_message, randomness, &derivation_path, &out.key_transcript, &out.kappa_transcript).unwrap();
    let signature = ThresholdEcdsaCombinedSigInternal::combine(THRESHOLD, randomizer.rho, &shares).unwrap();

    let master_public_key = out.key_transcript.constant_term();
    signature.verify(&hashed_message, &derivation_path, master_public_key).unwrap();
}

/// Supplying only t-1 signature shares must fail to combine.
#[test]
fn insufficient_shares_fail_to_combine() {
    let master_seed = Seed::new("insufficient-shares-seed", b"x").unwrap();
    let nodes = build_committee(5, &master_seed);
    let all_indices: Vec<NodeIndex> = nodes.iter().map(|n| n.index).collect();
    let reshare_dealers = &all_indices[..3];
    let product_dealers = &all_indices[..3];

    let out = run_presignature(
        Scalar::from_u64(42),
        Scalar::from_u64(99),
        &nodes,
        reshare_dealers,
        &all_indices,
        product_dealers,
        [None, None, None],
        &master_seed.derive("presig"),
    );

    let derivation_path = DerivationPath::new_bip32(&[1, 2, 3]);
    let hashed_message = [0x22u8; 32];
    let randomness = b"another 32-byte beacon output...";

    let signer = all_indices[0];
    let share = ThresholdEcdsaSigShareInternal::new(
        &derivation_path,
        &hashed_message,
        randomness,
        &out.key_transcript,
        &out.kappa_transcript,
        &out.lambda_openings[&signer],
        &out.key_lambda_openings[&signer],
        &out.kappa_lambda_openings[&signer],
    )
    .unwrap();
    let mut shares = BTreeMap::new();
    shares.insert(signer, share);

    let randomizer = derive_rho(&hashed_message, randomness, &derivation_path, &out.key_transcript, &out.kappa_transcript).unwrap();
    let result = ThresholdEcdsaCombinedSigInternal::combine(THRESHOLD, randomizer.rho, &shares);
    assert!(matches!(result, Err(Error::InsufficientOpenings { needed: 2, have: 1 })));
}

/// n=5, t=2, then reducing to a 3-node committee (simulating a
/// membership change that drops two nodes): two independent
/// single-dealer reshares of the same secret over the smaller committee
/// must still reconstruct the same constant term.
#[test]
fn reshare_after_membership_change_is_consistent_across_parallel_reshares() {
    let master_seed = Seed::new("membership-change-seed", b"reshare scenario").unwrap();
    let old_committee = build_committee(5, &master_seed);
    let new_committee: Vec<&Node> = old_committee.iter().take(3).collect();
    let new_indices: Vec<NodeIndex> = new_committee.iter().map(|n| n.index).collect();
    let recipients: Vec<MEGaPublicKey> = new_committee.iter().map(|n| n.public_key).collect();

    let secret = Scalar::from_u64(13579);
    let new_threshold = 1;
    let commitment = PolynomialCommitment::Simple(SimpleCommitment::from_points(vec![Point::mul_by_g(&secret)]));
    let associated_data = b"membership-change-round".to_vec();

    let reshare_via = |dealer_index: NodeIndex, seed: &Seed| -> Point {
        let dealing = IDkgDealingInternal::new(
            &SecretShares::ReshareOfUnmasked(secret),
            &seed.derive(&format!("dealing-{}", dealer_index.as_u32())),
            new_threshold,
            &recipients,
            dealer_index,
            &associated_data,
        )
        .unwrap();
        dealing
            .publicly_verify(
                &IDkgTranscriptOperation::ReshareOfUnmasked(commitment.clone()),
                new_threshold,
                dealer_index,
                recipients.len(),
                &associated_data,
            )
            .unwrap();
        let mut dealings = BTreeMap::new();
        dealings.insert(dealer_index, dealing);
        IDkgTranscriptInternal::combine_dealings(
            &IDkgTranscriptOperation::ReshareOfUnmasked(commitment.clone()),
            new_threshold,
            &dealings,
        )
        .unwrap()
        .constant_term()
    };

    let term_a = reshare_via(new_indices[0], &master_seed.derive("reshare-a"));
    let term_b = reshare_via(new_indices[1], &master_seed.derive("reshare-b"));
    assert_eq!(term_a, term_b);
    assert_eq!(term_a, Point::mul_by_g(&secret));
}
