//! Runs one full threshold-ECDSA round against a 4-node, threshold-2
//! committee: dealing, transcript combination, opening combination,
//! signature-share generation, combination, and final verification.

use std::collections::BTreeMap;

use tecdsa_core::commitment::{CommitmentOpening, PolynomialCommitment, SimpleCommitment};
use tecdsa_core::curve::{NodeIndex, Point, Scalar};
use tecdsa_core::idkg::{combine_openings, IDkgDealingInternal, IDkgTranscriptInternal, IDkgTranscriptOperation, SecretShares};
use tecdsa_core::key::DerivationPath;
use tecdsa_core::mega::{MEGaPrivateKey, MEGaPublicKey};
use tecdsa_core::seed::Seed;
use tecdsa_core::sign::{ThresholdEcdsaCombinedSigInternal, ThresholdEcdsaSigShareInternal};
use tecdsa_core::{Error, Result};

const NUM_NODES: u32 = 4;
const THRESHOLD: usize = 2;

struct Node {
    index: NodeIndex,
    secret_key: MEGaPrivateKey,
    public_key: MEGaPublicKey,
}

fn build_committee(master_seed: &Seed) -> Vec<Node> {
    (0..NUM_NODES)
        .map(|i| {
            let index = NodeIndex::new(i);
            let secret_key = MEGaPrivateKey::generate(&master_seed.derive(&format!("node-{i}-mega-key")));
            let public_key = secret_key.public_key();
            Node {
                index,
                secret_key,
                public_key,
            }
        })
        .collect()
}

fn public_keys(nodes: &[Node]) -> Vec<MEGaPublicKey> {
    nodes.iter().map(|n| n.public_key).collect()
}

fn pedersen_parts(opening: &CommitmentOpening) -> Result<(Scalar, Scalar)> {
    match opening {
        CommitmentOpening::Pedersen(v, m) => Ok((*v, *m)),
        CommitmentOpening::Simple(_) => Err(Error::InvalidCommitment),
    }
}

fn simple_part(opening: &CommitmentOpening) -> Result<Scalar> {
    match opening {
        CommitmentOpening::Simple(v) => Ok(*v),
        CommitmentOpening::Pedersen(_, _) => Err(Error::InvalidCommitment),
    }
}

/// One node's view of a dealing it received: decrypts and checks every
/// dealer's ciphertext, then combines across dealers into this node's
/// final share of the transcript.
fn receiver_opening(
    transcript: &IDkgTranscriptInternal,
    dealings: &BTreeMap<NodeIndex, IDkgDealingInternal>,
    reconstruction_threshold: usize,
    receiver: &Node,
    associated_data: &[u8],
) -> Result<CommitmentOpening> {
    let mut dealer_openings = BTreeMap::new();
    for (&dealer_index, dealing) in dealings {
        let opening = dealing.decrypt_and_check(
            associated_data,
            dealer_index,
            receiver.index,
            &receiver.secret_key,
            &receiver.public_key,
        )?;
        dealer_openings.insert(dealer_index, opening);
    }
    combine_openings(transcript, receiver.index, reconstruction_threshold, &dealer_openings)
}

/// Runs one dealing round: every index in `dealer_indices` deals a
/// share via `shares_for`, every dealing is publicly verified, the
/// transcript is combined, and every node in the committee combines its
/// own final opening.
#[allow(clippy::too_many_arguments)]
fn run_round(
    name: &str,
    op: &IDkgTranscriptOperation,
    shares_for: impl Fn(NodeIndex) -> SecretShares,
    dealer_indices: &[NodeIndex],
    reconstruction_threshold: usize,
    nodes: &[Node],
    round_seed: &Seed,
) -> Result<(IDkgTranscriptInternal, BTreeMap<NodeIndex, CommitmentOpening>)> {
    let recipients = public_keys(nodes);
    let associated_data = format!("tecdsa-demo-round:{name}").into_bytes();

    let mut dealings = BTreeMap::new();
    for &dealer_index in dealer_indices {
        let shares = shares_for(dealer_index);
        let dealing_seed = round_seed.derive(&format!("dealing-{}", dealer_index.as_u32()));
        let dealing = IDkgDealingInternal::new(&shares, &dealing_seed, THRESHOLD, &recipients, dealer_index, &associated_data)?;
        dealing.publicly_verify(op, THRESHOLD, dealer_index, recipients.len(), &associated_data)?;
        dealings.insert(dealer_index, dealing);
    }

    let transcript = IDkgTranscriptInternal::combine_dealings(op, reconstruction_threshold, &dealings)?;

    let mut openings = BTreeMap::new();
    for node in nodes {
        let opening = receiver_opening(&transcript, &dealings, reconstruction_threshold, node, &associated_data)?;
        openings.insert(node.index, opening);
    }

    tracing::info!(round = name, dealers = dealer_indices.len(), "transcript combined");
    Ok((transcript, openings))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let master_seed = Seed::new("tecdsa-demo-master-seed", b"one committee, one signature")?;
    let nodes = build_committee(&master_seed);
    let all_dealers: Vec<NodeIndex> = nodes.iter().map(|n| n.index).collect();
    let reshare_dealers = &all_dealers[..THRESHOLD];

    // `key` and `kappa`: unmasked secrets reshared by `THRESHOLD` dealers
    // who already hold them (standing in for a prior keygen/presignature
    // round this demo doesn't simulate from scratch).
    let master_key_secret = Scalar::random(&mut master_seed.derive("master-key-secret").rng());
    let master_key_commitment =
        PolynomialCommitment::Simple(SimpleCommitment::from_points(vec![Point::mul_by_g(&master_key_secret)]));
    let (key_transcript, key_openings) = run_round(
        "key",
        &IDkgTranscriptOperation::ReshareOfUnmasked(master_key_commitment),
        |_dealer| SecretShares::ReshareOfUnmasked(master_key_secret),
        reshare_dealers,
        THRESHOLD,
        &nodes,
        &master_seed.derive("round-key"),
    )?;

    let kappa_secret = Scalar::random(&mut master_seed.derive("kappa-secret").rng());
    let kappa_commitment = PolynomialCommitment::Simple(SimpleCommitment::from_points(vec![Point::mul_by_g(&kappa_secret)]));
    let (kappa_transcript, kappa_openings) = run_round(
        "kappa",
        &IDkgTranscriptOperation::ReshareOfUnmasked(kappa_commitment),
        |_dealer| SecretShares::ReshareOfUnmasked(kappa_secret),
        reshare_dealers,
        THRESHOLD,
        &nodes,
        &master_seed.derive("round-kappa"),
    )?;

    // `lambda`: a jointly-random masked value, summed from every node.
    let (lambda_transcript, lambda_openings) = run_round(
        "lambda",
        &IDkgTranscriptOperation::Random,
        |_dealer| SecretShares::Random,
        &all_dealers,
        all_dealers.len(),
        &nodes,
        &master_seed.derive("round-lambda"),
    )?;

    // `key * lambda` and `kappa * lambda`: each of `THRESHOLD` dealers
    // multiplies its own already-combined shares of the two inputs.
    let (key_lambda_transcript, key_lambda_openings) = run_round(
        "key-lambda",
        &IDkgTranscriptOperation::UnmaskedTimesMasked(
            key_transcript.combined_commitment.inner().clone(),
            lambda_transcript.combined_commitment.inner().clone(),
        ),
        |dealer| {
            let left = simple_part(&key_openings[&dealer]).expect("key opening is unmasked");
            let (right_value, right_mask) = pedersen_parts(&lambda_openings[&dealer]).expect("lambda opening is masked");
            SecretShares::UnmaskedTimesMasked {
                left,
                right_value,
                right_mask,
            }
        },
        reshare_dealers,
        THRESHOLD,
        &nodes,
        &master_seed.derive("round-key-lambda"),
    )?;

    let (kappa_lambda_transcript, kappa_lambda_openings) = run_round(
        "kappa-lambda",
        &IDkgTranscriptOperation::UnmaskedTimesMasked(
            kappa_transcript.combined_commitment.inner().clone(),
            lambda_transcript.combined_commitment.inner().clone(),
        ),
        |dealer| {
            let left = simple_part(&kappa_openings[&dealer]).expect("kappa opening is unmasked");
            let (right_value, right_mask) = pedersen_parts(&lambda_openings[&dealer]).expect("lambda opening is masked");
            SecretShares::UnmaskedTimesMasked {
                left,
                right_value,
                right_mask,
            }
        },
        reshare_dealers,
        THRESHOLD,
        &nodes,
        &master_seed.derive("round-kappa-lambda"),
    )?;

    // Signing: derive a child key via a short BIP32 path and hash a
    // message, then have every node in `reshare_dealers` (>= THRESHOLD)
    // emit a signature share.
    let derivation_path = DerivationPath::new_bip32(&[1, 2, 3]);
    let hashed_message = hash_message(b"Attack at dawn.");
    let randomness = b"beacon-output-for-this-signing-round";

    let mut shares = BTreeMap::new();
    for &signer in reshare_dealers {
        let share = ThresholdEcdsaSigShareInternal::new(
            &derivation_path,
            &hashed_message,
            randomness,
            &key_transcript,
            &kappa_transcript,
            &lambda_openings[&signer],
            &key_lambda_openings[&signer],
            &kappa_lambda_openings[&signer],
        )?;
        share.verify(
            &derivation_path,
            &hashed_message,
            randomness,
            signer,
            &key_transcript,
            &kappa_transcript,
            &lambda_transcript,
            &key_lambda_transcript,
            &kappa_lambda_transcript,
        )?;
        shares.insert(signer, share);
    }

    let randomizer = tecdsa_core::sign::derive_rho(
        &hashed_message,
        randomness,
        &derivation_path,
        &key_transcript,
        &kappa_transcript,
    )?;

    let signature = ThresholdEcdsaCombinedSigInternal::combine(THRESHOLD, randomizer.rho, &shares)?;
    let master_public_key = key_transcript.constant_term();
    signature.verify(&hashed_message, &derivation_path, master_public_key)?;

    tracing::info!(
        r = hex::encode(signature.r.to_bytes()),
        s = hex::encode(signature.s.to_bytes()),
        "signature verified"
    );
    println!("r = {}", hex::encode(signature.r.to_bytes()));
    println!("s = {}", hex::encode(signature.s.to_bytes()));
    Ok(())
}

fn hash_message(message: &[u8]) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(message);
    hasher.finalize().into()
}
