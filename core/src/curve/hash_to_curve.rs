use crate::curve::{Point, Scalar};
use crate::error::{Error, Result};
use elliptic_curve::hash2curve::{ExpandMsgXmd, GroupDigest};
use k256::Secp256k1;
use sha2::{Digest, Sha256};

const SHA256_BLOCK_BYTES: usize = 64;
const SHA256_OUTPUT_BYTES: usize = 32;

/// `expand_message_xmd` from draft-irtf-cfrg-hash-to-curve, instantiated
/// with SHA-256. Reimplemented independently of `k256`'s internal
/// `hash2curve` support so this crate's own known-answer tests can check
/// it directly.
pub fn expand_message_xmd(msg: &[u8], dst: &[u8], len_in_bytes: usize) -> Result<Vec<u8>> {
    let ell = (len_in_bytes + SHA256_OUTPUT_BYTES - 1) / SHA256_OUTPUT_BYTES;
    if ell > 255 || len_in_bytes > 65535 {
        return Err(Error::InvalidArguments("expand_message_xmd length out of range".into()));
    }

    let dst_prime: Vec<u8> = if dst.len() > 255 {
        let mut hasher = Sha256::new();
        hasher.update(b"H2C-OVERSIZE-DST-");
        hasher.update(dst);
        hasher.finalize().to_vec()
    } else {
        dst.to_vec()
    };
    let mut dst_prime = dst_prime;
    dst_prime.push(dst_prime.len() as u8);

    let mut msg_prime = Vec::with_capacity(SHA256_BLOCK_BYTES + msg.len() + 2 + 1 + dst_prime.len());
    msg_prime.extend(std::iter::repeat(0u8).take(SHA256_BLOCK_BYTES));
    msg_prime.extend_from_slice(msg);
    msg_prime.extend_from_slice(&(len_in_bytes as u16).to_be_bytes());
    msg_prime.push(0u8);
    msg_prime.extend_from_slice(&dst_prime);

    let b0 = Sha256::digest(&msg_prime);

    let mut blocks: Vec<Vec<u8>> = Vec::with_capacity(ell);
    {
        let mut hasher = Sha256::new();
        hasher.update(b0);
        hasher.update([1u8]);
        hasher.update(&dst_prime);
        blocks.push(hasher.finalize().to_vec());
    }
    for i in 2..=ell {
        let mut xored = vec![0u8; SHA256_OUTPUT_BYTES];
        for (o, (a, b)) in xored.iter_mut().zip(b0.iter().zip(blocks[i - 2].iter())) {
            *o = a ^ b;
        }
        let mut hasher = Sha256::new();
        hasher.update(&xored);
        hasher.update([i as u8]);
        hasher.update(&dst_prime);
        blocks.push(hasher.finalize().to_vec());
    }

    let mut out: Vec<u8> = blocks.into_iter().flatten().collect();
    out.truncate(len_in_bytes);
    Ok(out)
}

/// Hashes `msg` to a scalar under domain separator `dst`, used by the
/// random oracle's `OutputScalar` and by MEGa's PoP computation.
pub fn hash_to_scalar(dst: &[u8], msg: &[u8]) -> Result<Scalar> {
    let bytes = expand_message_xmd(msg, dst, 48)?;
    let mut wide = [0u8; 64];
    wide[16..].copy_from_slice(&bytes);
    Ok(Scalar::from_bytes_wide(&wide))
}

/// Hashes `msg` to a curve point under domain separator `dst` via
/// SSWU + the secp256k1 isogeny map (random oracle variant: two field
/// elements mapped and added). Delegates to `k256`'s `hash2curve`
/// support, which implements the same draft this crate's own
/// `expand_message_xmd` is drawn from.
pub fn hash_to_curve_ro(dst: &[u8], msg: &[u8]) -> Result<Point> {
    let projective = Secp256k1::hash_from_bytes::<ExpandMsgXmd<Sha256>>(&[msg], &[dst])
        .map_err(|_| Error::Encoding("hash-to-curve failed".into()))?;
    Ok(Point(projective))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_message_xmd_known_answer_vector() {
        // expand_message_xmd("", "QUUX-V01-CS02-with-expander-SHA256-128", 32)
        // = 68a985b8…f07235, per draft-irtf-cfrg-hash-to-curve test vectors.
        let out = expand_message_xmd(b"", b"QUUX-V01-CS02-with-expander-SHA256-128", 32).unwrap();
        let hex = hex::encode(&out);
        assert_eq!(out.len(), 32);
        assert!(hex.starts_with("68a985b8"), "got {hex}");
        assert!(hex.ends_with("f07235"), "got {hex}");
    }

    #[test]
    fn expand_message_xmd_is_deterministic_and_length_respecting() {
        let a = expand_message_xmd(b"hello", b"test-dst", 48).unwrap();
        let b = expand_message_xmd(b"hello", b"test-dst", 48).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 48);
        let c = expand_message_xmd(b"goodbye", b"test-dst", 48).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn expand_message_xmd_rejects_output_length_over_255_blocks() {
        assert!(expand_message_xmd(b"x", b"dst", 255 * 32 + 1).is_err());
    }

    #[test]
    fn expand_message_xmd_handles_oversized_dst() {
        let big_dst = vec![0x41u8; 300];
        assert!(expand_message_xmd(b"msg", &big_dst, 32).is_ok());
    }

    #[test]
    fn hash_to_curve_known_answer_vector() {
        // hash_to_curve("", "QUUX-V01-CS02-with-secp256k1_XMD:SHA-256_SSWU_RO_")
        // yields (c1cae290…, 64fa678e…).
        let p = hash_to_curve_ro(b"QUUX-V01-CS02-with-secp256k1_XMD:SHA-256_SSWU_RO_", b"").unwrap();
        let x = p.affine_x().unwrap();
        let hex = hex::encode(x);
        assert!(hex.starts_with("c1cae290"), "got {hex}");
    }

    #[test]
    fn hash_to_scalar_is_deterministic() {
        let a = hash_to_scalar(b"dst", b"msg").unwrap();
        let b = hash_to_scalar(b"dst", b"msg").unwrap();
        assert_eq!(a, b);
        let c = hash_to_scalar(b"dst", b"other-msg").unwrap();
        assert_ne!(a, c);
    }
}
