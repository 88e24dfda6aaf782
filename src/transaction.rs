//! Transaction validation against a UTXO snapshot

use crate::crypto::SignatureVerifier;
use crate::error::TxRejection;
use crate::types::*;
use crate::utxo::UtxoSet;
use std::collections::HashSet;

/// Validates transactions against a UTXO set using a signature verifier.
///
/// Validation is a pure predicate: the set is only ever borrowed immutably.
pub struct TransactionValidator<V> {
    verifier: V,
}

impl<V: SignatureVerifier> TransactionValidator<V> {
    pub fn new(verifier: V) -> Self {
        Self { verifier }
    }

    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    /// CheckTransaction: 𝒯𝒳 × 𝒰𝒮 → {valid, invalid}
    ///
    /// A transaction tx is valid against us if and only if:
    /// 1. ∀i ∈ ins: i.prevout ∈ us
    /// 2. ∀i ∈ ins: verify(us(i.prevout).key, payload(tx, i), i.signature)
    /// 3. no prevout is claimed by two inputs of tx
    /// 4. ∀o ∈ outs: o.value ≥ 0
    /// 5. Σᵢ us(i.prevout).value ≥ Σₒ o.value
    pub fn check_transaction(&self, tx: &Transaction, utxo_set: &UtxoSet) -> ValidationResult {
        let mut claimed = HashSet::with_capacity(tx.inputs().len());
        let mut total_input_value = 0i64;

        for (i, input) in tx.inputs().iter().enumerate() {
            // 1. Referenced output must be unspent
            let utxo = match utxo_set.get(&input.prevout) {
                Some(utxo) => utxo,
                None => return ValidationResult::Invalid(TxRejection::MissingUtxo { input: i }),
            };

            // 2. Signature must verify against the output's key
            let payload = match tx.signing_payload(i) {
                Some(payload) => payload,
                None => return ValidationResult::Invalid(TxRejection::InvalidSignature { input: i }),
            };
            if !self.verifier.verify(&utxo.public_key, &payload, &input.signature) {
                return ValidationResult::Invalid(TxRejection::InvalidSignature { input: i });
            }

            // 3. No output claimed twice
            if !claimed.insert(input.prevout) {
                return ValidationResult::Invalid(TxRejection::DuplicateInput { input: i });
            }

            total_input_value = match total_input_value.checked_add(utxo.value) {
                Some(sum) => sum,
                None => return ValidationResult::Invalid(TxRejection::ValueOverflow),
            };
        }

        // 4. Outputs must be non-negative
        let mut total_output_value = 0i64;
        for (i, output) in tx.outputs().iter().enumerate() {
            if output.value < 0 {
                return ValidationResult::Invalid(TxRejection::NegativeOutput {
                    output: i,
                    value: output.value,
                });
            }
            total_output_value = match total_output_value.checked_add(output.value) {
                Some(sum) => sum,
                None => return ValidationResult::Invalid(TxRejection::ValueOverflow),
            };
        }

        // 5. No value created
        if total_input_value < total_output_value {
            return ValidationResult::Invalid(TxRejection::InsufficientInput {
                input_total: total_input_value,
                output_total: total_output_value,
            });
        }

        ValidationResult::Valid
    }

    /// Boolean form of [`check_transaction`](Self::check_transaction)
    pub fn is_valid_tx(&self, tx: &Transaction, utxo_set: &UtxoSet) -> bool {
        self.check_transaction(tx, utxo_set).is_valid()
    }
}

/// Fee of `tx` as seen from `utxo_set`.
///
/// Inputs that cannot be resolved contribute nothing, so the result can be
/// negative. Sums saturate instead of overflowing.
pub fn calculate_fee(tx: &Transaction, utxo_set: &UtxoSet) -> Amount {
    let total_input: Amount = tx
        .inputs()
        .iter()
        .filter_map(|input| utxo_set.get(&input.prevout))
        .fold(0i64, |acc, utxo| acc.saturating_add(utxo.value));
    let total_output: Amount = tx
        .outputs()
        .iter()
        .fold(0i64, |acc, o| acc.saturating_add(o.value));
    total_input.saturating_sub(total_output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn test_valid_transaction() {
        let alice = Key::new(1);
        let bob = Key::new(2);
        let (set, op) = funded(&alice, 100);
        let tx = signed_spend(&[(op, &alice)], &[(90, &bob)]);

        let validator = TransactionValidator::new(Secp256k1Verifier::new());
        assert_eq!(validator.check_transaction(&tx, &set), ValidationResult::Valid);
        assert!(validator.is_valid_tx(&tx, &set));
    }

    #[test]
    fn test_missing_utxo() {
        let alice = Key::new(1);
        let (set, _) = funded(&alice, 100);
        let tx = signed_spend(&[(OutPoint::new([9; 32], 0), &alice)], &[(10, &alice)]);

        let validator = TransactionValidator::new(Secp256k1Verifier::new());
        assert_eq!(
            validator.check_transaction(&tx, &set),
            ValidationResult::Invalid(TxRejection::MissingUtxo { input: 0 })
        );
    }

    #[test]
    fn test_signature_by_wrong_key() {
        let alice = Key::new(1);
        let mallory = Key::new(3);
        let (set, op) = funded(&alice, 100);
        let tx = signed_spend(&[(op, &mallory)], &[(100, &mallory)]);

        let validator = TransactionValidator::new(Secp256k1Verifier::new());
        assert_eq!(
            validator.check_transaction(&tx, &set),
            ValidationResult::Invalid(TxRejection::InvalidSignature { input: 0 })
        );
    }

    #[test]
    fn test_signature_invalidated_by_output_change() {
        let alice = Key::new(1);
        let (set, op) = funded(&alice, 100);
        let signed = signed_spend(&[(op, &alice)], &[(50, &alice)]);

        // Same input and signature, different output value
        let mut altered = Transaction::new();
        altered.add_input(op);
        altered.add_output(40, alice.public.clone());
        altered.add_signature(0, signed.inputs()[0].signature.clone());
        altered.finalize();

        let validator = TransactionValidator::new(Secp256k1Verifier::new());
        assert!(validator.is_valid_tx(&signed, &set));
        assert!(!validator.is_valid_tx(&altered, &set));
    }

    #[test]
    fn test_duplicate_claim() {
        let alice = Key::new(1);
        let (set, op) = funded(&alice, 100);
        let tx = signed_spend(&[(op, &alice), (op, &alice)], &[(150, &alice)]);

        let validator = TransactionValidator::new(Secp256k1Verifier::new());
        assert_eq!(
            validator.check_transaction(&tx, &set),
            ValidationResult::Invalid(TxRejection::DuplicateInput { input: 1 })
        );
    }

    #[test]
    fn test_negative_output() {
        let alice = Key::new(1);
        let (set, op) = funded(&alice, 100);
        let tx = signed_spend(&[(op, &alice)], &[(-1, &alice)]);

        let validator = TransactionValidator::new(Secp256k1Verifier::new());
        assert_eq!(
            validator.check_transaction(&tx, &set),
            ValidationResult::Invalid(TxRejection::NegativeOutput { output: 0, value: -1 })
        );
    }

    #[test]
    fn test_outputs_exceed_inputs() {
        let alice = Key::new(1);
        let (set, op) = funded(&alice, 100);
        let tx = signed_spend(&[(op, &alice)], &[(101, &alice)]);

        let validator = TransactionValidator::new(Secp256k1Verifier::new());
        assert_eq!(
            validator.check_transaction(&tx, &set),
            ValidationResult::Invalid(TxRejection::InsufficientInput {
                input_total: 100,
                output_total: 101
            })
        );
    }

    #[test]
    fn test_output_overflow_rejected() {
        let alice = Key::new(1);
        let (set, op) = funded(&alice, 100);
        let tx = signed_spend(&[(op, &alice)], &[(i64::MAX, &alice), (1, &alice)]);

        let validator = TransactionValidator::new(Secp256k1Verifier::new());
        assert_eq!(
            validator.check_transaction(&tx, &set),
            ValidationResult::Invalid(TxRejection::ValueOverflow)
        );
    }

    #[test]
    fn test_validation_does_not_mutate() {
        let alice = Key::new(1);
        let (set, op) = funded(&alice, 100);
        let tx = signed_spend(&[(op, &alice)], &[(100, &alice)]);
        let before = set.clone();

        let validator = TransactionValidator::new(Secp256k1Verifier::new());
        validator.check_transaction(&tx, &set);
        assert_eq!(set, before);
    }

    #[test]
    fn test_empty_transaction_is_valid() {
        let validator = TransactionValidator::new(Secp256k1Verifier::new());
        assert!(validator.is_valid_tx(&Transaction::new(), &UtxoSet::new()));
    }

    #[test]
    fn test_calculate_fee() {
        let alice = Key::new(1);
        let (set, op) = funded(&alice, 100);
        let tx = signed_spend(&[(op, &alice)], &[(70, &alice)]);
        assert_eq!(calculate_fee(&tx, &set), 30);
    }

    #[test]
    fn test_calculate_fee_unresolved_inputs_count_as_zero() {
        let alice = Key::new(1);
        let (set, op) = funded(&alice, 100);
        let tx = signed_spend(
            &[(op, &alice), (OutPoint::new([5; 32], 0), &alice)],
            &[(70, &alice)],
        );
        assert_eq!(calculate_fee(&tx, &set), 30);

        let orphan = signed_spend(&[(OutPoint::new([5; 32], 0), &alice)], &[(70, &alice)]);
        assert_eq!(calculate_fee(&orphan, &set), -70);
    }
}
