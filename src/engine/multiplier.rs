// ============================================================================
// Multiplier
// Runs the exponent adder, mantissa multiplier and normalizer as one circuit
// ============================================================================

use crate::engine::{
    accumulate_partial_products, add_exponents_with_overflow, normalize_with_steps,
    resolve_partial_products,
};
use crate::interfaces::{CircuitEvent, CircuitObserver, EventBatch, NoOpObserver};
use crate::numeric::{Number, NumeralError, NumeralResult};
use std::sync::Arc;

/// Channel-level multiplier with a pluggable observer
pub struct Multiplier {
    /// Receives one event batch per multiplication
    observer: Arc<dyn CircuitObserver>,
}

impl Multiplier {
    /// Create a multiplier reporting to `observer`
    pub fn new(observer: Arc<dyn CircuitObserver>) -> Self {
        Self { observer }
    }

    /// Multiply two numbers of the same profile.
    ///
    /// The sign is the XOR of the operand signs. The exponent comes from the
    /// exponent adder and the mantissa from the shift-and-accumulate
    /// multiplier. With `normalize` set, the mantissa is shifted until its
    /// leading channel is set; otherwise the raw pair is returned, which may
    /// carry a clear leading channel.
    ///
    /// Exponent wraparound and carries lost at the top of the mantissa are
    /// not errors; they only show up in the observer's events.
    ///
    /// # Errors
    /// `ProfileMismatch` when the operands use different profiles.
    pub fn multiply(&self, a: &Number, b: &Number, normalize: bool) -> NumeralResult<Number> {
        let profile = a.profile();
        if profile != b.profile() {
            return Err(NumeralError::ProfileMismatch);
        }

        let negative = a.is_negative() ^ b.is_negative();
        let mut events = EventBatch::new();

        // Stage 1: exponents
        let exponent = add_exponents_with_overflow(a.exponent(), b.exponent(), &profile);
        events.push(CircuitEvent::ExponentsAdded {
            exponent: exponent.channels.clone(),
            wraparound: exponent.wraparound,
        });

        // Stage 2: partial products, then one carry pass
        let raw = accumulate_partial_products(a.mantissa(), b.mantissa());
        events.push(CircuitEvent::PartialProductsAccumulated { raw: raw.clone() });

        let mantissa = resolve_partial_products(raw);
        events.push(CircuitEvent::MantissaResolved {
            mantissa: mantissa.channels.clone(),
            discarded: mantissa.discarded,
        });

        // Stage 3: normalization
        let (mantissa, exponent) = if normalize {
            if mantissa.channels.is_zero() {
                events.push(CircuitEvent::ZeroMantissa);
            }
            let normalization =
                normalize_with_steps(&mantissa.channels, &exponent.channels, &profile);
            events.push(CircuitEvent::Normalized {
                shifts: normalization.shifts,
                wraparound: normalization.wraparound,
            });
            (normalization.mantissa, normalization.exponent)
        } else {
            (mantissa.channels, exponent.channels)
        };

        let product = Number::from_parts(negative, mantissa, exponent, profile);
        tracing::debug!(%a, %b, %product, normalize, "multiplied");

        self.observer.on_events(events);
        Ok(product)
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::new(Arc::new(NoOpObserver))
    }
}

/// Multiply with a no-op observer. See [`Multiplier::multiply`].
///
/// # Example
/// ```
/// use channel_float::domain::Profile;
/// use channel_float::engine::multiply;
/// use channel_float::numeric::Number;
///
/// let p = Profile::basic();
/// let a = Number::parse(".11011e-111(+2)", p).unwrap();
/// let b = Number::parse("-.11e-100(+2)", p).unwrap();
/// let product = multiply(&a, &b, true).unwrap();
/// assert_eq!(product.to_string(), "-.1010001e-1001(+2)");
/// assert_eq!(product.to_f64(), -0.00494384765625);
/// ```
pub fn multiply(a: &Number, b: &Number, normalize: bool) -> NumeralResult<Number> {
    Multiplier::default().multiply(a, b, normalize)
}

impl Number {
    /// Multiply by `other`. See [`Multiplier::multiply`].
    pub fn multiply(&self, other: &Number, normalize: bool) -> NumeralResult<Number> {
        multiply(self, other, normalize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Profile, ProfileBuilder};
    use crate::interfaces::RecordingObserver;
    use crate::numeric::{ChannelSet, Wraparound};
    use proptest::prelude::*;
    use quickcheck::quickcheck;

    fn basic_number(negative: bool, mantissa: u16, exponent: u8) -> Number {
        let m = ChannelSet::from_bits((0..16).map(|i| mantissa & (0x8000 >> i) != 0)).unwrap();
        let e = ChannelSet::from_bits((0..8).map(|i| exponent & (1 << i) != 0)).unwrap();
        Number::new(negative, m, e, Profile::basic()).unwrap()
    }

    fn extended_number(mantissa: &[usize], real_exponent: u64) -> Number {
        let p = Profile::extended();
        Number::new(
            false,
            ChannelSet::with_set(16, mantissa).unwrap(),
            p.exponent_pattern(real_exponent * p.units_per_step()),
            p,
        )
        .unwrap()
    }

    fn recorded(a: &Number, b: &Number, normalize: bool) -> Vec<CircuitEvent> {
        let observer = Arc::new(RecordingObserver::new());
        Multiplier::new(observer.clone())
            .multiply(a, b, normalize)
            .unwrap();
        observer.take()
    }

    fn exponent_wraparound(events: &[CircuitEvent]) -> Option<Wraparound> {
        events.iter().find_map(|event| match event {
            CircuitEvent::ExponentsAdded { wraparound, .. } => Some(*wraparound),
            _ => None,
        })
    }

    fn normalization(events: &[CircuitEvent]) -> Option<(u32, Wraparound)> {
        events.iter().find_map(|event| match event {
            CircuitEvent::Normalized { shifts, wraparound } => Some((*shifts, *wraparound)),
            _ => None,
        })
    }

    #[test]
    fn test_product_of_parsed_operands() {
        let p = Profile::basic();
        let a = Number::parse(".11011e-111(+2)", p).unwrap();
        let b = Number::parse("-.11e-100(+2)", p).unwrap();
        let product = multiply(&a, &b, true).unwrap();

        let exact = a.to_f64() * b.to_f64();
        let step = 2f64.powi(-16) * 2f64.powi(-7);
        assert!((product.to_f64() - exact).abs() <= step);
        assert_eq!(product.to_f64(), -0.00494384765625);
        assert!(product.is_negative());
        assert!(product.is_normalized());
    }

    #[test]
    fn test_profile_mismatch() {
        let a = Number::from_f64(0.75, Profile::basic()).unwrap();
        let b = Number::from_f64(0.75, Profile::extended()).unwrap();
        assert_eq!(multiply(&a, &b, true), Err(NumeralError::ProfileMismatch));

        let plus_one = ProfileBuilder::new(16, 8).with_bias(1).build().unwrap();
        let c = Number::zero(plus_one);
        assert_eq!(a.multiply(&c, false), Err(NumeralError::ProfileMismatch));
    }

    #[test]
    fn test_unnormalized_halves() {
        let p = Profile::basic();
        let half = Number::from_f64(0.5, p).unwrap();
        let raw = multiply(&half, &half, false).unwrap();
        assert_eq!(raw.mantissa(), &ChannelSet::with_set(16, &[1]).unwrap());
        assert!(!raw.is_normalized());
        assert_eq!(raw.to_f64(), 0.25);

        let normalized = multiply(&half, &half, true).unwrap();
        assert_eq!(normalized.mantissa(), &ChannelSet::with_set(16, &[0]).unwrap());
        assert_eq!(normalized.to_f64(), 0.25);
    }

    #[test]
    fn test_extended_profile_product() {
        let p = Profile::extended();
        let a = Number::from_f64(1.5, p).unwrap();
        let b = Number::from_f64(2.5, p).unwrap();
        let product = a.multiply(&b, true).unwrap();
        assert_eq!(product.to_f64(), 3.75);
        assert_eq!(product.real_exponent(), 2.0);
    }

    #[test]
    fn test_observer_sees_every_stage() {
        let observer = Arc::new(RecordingObserver::new());
        let multiplier = Multiplier::new(observer.clone());
        let p = Profile::basic();
        let a = Number::parse(".11011e-111(+2)", p).unwrap();
        let b = Number::parse("-.11e-100(+2)", p).unwrap();
        multiplier.multiply(&a, &b, true).unwrap();

        let events = observer.take();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[0],
            CircuitEvent::ExponentsAdded {
                exponent: ChannelSet::with_set(8, &[0, 3]).unwrap(),
                wraparound: Wraparound::default(),
            }
        );
        match &events[1] {
            CircuitEvent::PartialProductsAccumulated { raw } => {
                assert_eq!(&raw.counts()[..8], &[0, 1, 2, 1, 1, 2, 1, 0]);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(
            events[2],
            CircuitEvent::MantissaResolved {
                mantissa: ChannelSet::with_set(16, &[0, 2, 6]).unwrap(),
                discarded: 0,
            }
        );
        assert_eq!(
            events[3],
            CircuitEvent::Normalized {
                shifts: 0,
                wraparound: Wraparound::default(),
            }
        );
    }

    #[test]
    fn test_ordinary_products_report_no_wrap() {
        let p = Profile::basic();
        for (x, y) in [(0.75, 0.5), (0.0263671875, -0.1875), (3.5, 0.001)] {
            let a = Number::from_f64(x, p).unwrap();
            let b = Number::from_f64(y, p).unwrap();
            let events = recorded(&a, &b, true);
            assert_eq!(exponent_wraparound(&events), Some(Wraparound::default()));
            assert!(normalization(&events).unwrap().1.is_clean());
        }
    }

    #[test]
    fn test_exponent_overflow_is_reported() {
        let largest = basic_number(false, 0xFFFF, 0xFF);
        let events = recorded(&largest, &largest, true);
        assert_eq!(
            exponent_wraparound(&events),
            Some(Wraparound {
                overflow: 1,
                underflow: 0
            })
        );
    }

    #[test]
    fn test_exponent_below_bias_is_reported() {
        // stored 0 + stored 1 − 2 wraps to 255
        let a = basic_number(false, 0x8000, 0);
        let b = basic_number(false, 0x8000, 1);
        let events = recorded(&a, &b, false);
        assert_eq!(
            exponent_wraparound(&events),
            Some(Wraparound {
                overflow: 0,
                underflow: 1
            })
        );
    }

    #[test]
    fn test_extended_normalization_reports_only_real_wraps() {
        // .1 × 2^2 by .01 × 2^1: two shifts from real exponent 3 down to 1
        let a = extended_number(&[0], 2);
        let b = extended_number(&[1], 1);
        let events = recorded(&a, &b, true);
        assert_eq!(exponent_wraparound(&events), Some(Wraparound::default()));
        assert_eq!(normalization(&events), Some((2, Wraparound::default())));
        assert_eq!(a.multiply(&b, true).unwrap().to_f64(), 1.0);

        // .1 × 2^0 squared: the one shift has to go below exponent 0
        let half = extended_number(&[0], 0);
        let events = recorded(&half, &half, true);
        assert_eq!(
            normalization(&events),
            Some((
                1,
                Wraparound {
                    overflow: 0,
                    underflow: 1
                }
            ))
        );
    }

    #[test]
    fn test_observer_reports_zero_mantissa() {
        let observer = Arc::new(RecordingObserver::new());
        let multiplier = Multiplier::new(observer.clone());
        let p = Profile::basic();
        let zero = Number::zero(p);
        let x = Number::from_f64(0.75, p).unwrap();
        multiplier.multiply(&zero, &x, true).unwrap();
        assert!(observer.events().contains(&CircuitEvent::ZeroMantissa));

        // no normalization requested, no normalization events
        observer.take();
        multiplier.multiply(&zero, &x, false).unwrap();
        assert_eq!(observer.events().len(), 3);
    }

    #[test]
    fn test_saturation_is_silent() {
        let largest = basic_number(false, 0xFFFF, 0xFF);
        let product = multiply(&largest, &largest, true).unwrap();
        assert_eq!(product.stored_exponent_units(), 252);
        assert!(product.is_normalized());
    }

    fn prop_sign_is_xor(
        neg_a: bool,
        mant_a: u16,
        exp_a: u8,
        neg_b: bool,
        mant_b: u16,
        exp_b: u8,
        normalize: bool,
    ) -> bool {
        let a = basic_number(neg_a, mant_a, exp_a);
        let b = basic_number(neg_b, mant_b, exp_b);
        match multiply(&a, &b, normalize) {
            Ok(product) => product.is_negative() == (neg_a ^ neg_b),
            Err(_) => false,
        }
    }

    #[test]
    fn test_sign_law() {
        quickcheck(prop_sign_is_xor as fn(bool, u16, u8, bool, u16, u8, bool) -> bool);
    }

    proptest! {
        #[test]
        fn prop_zero_absorbs(
            negative in any::<bool>(),
            mantissa in any::<u16>(),
            exponent in any::<u8>(),
            normalize in any::<bool>(),
        ) {
            let x = basic_number(negative, mantissa, exponent);
            let zero = Number::zero(Profile::basic());
            for product in [
                multiply(&zero, &x, normalize).unwrap(),
                multiply(&x, &zero, normalize).unwrap(),
            ] {
                prop_assert!(product.mantissa().is_zero());
                prop_assert_eq!(product.to_f64(), 0.0);
                if normalize {
                    prop_assert!(product.exponent().is_zero());
                }
            }
        }

        #[test]
        fn prop_normalized_product_is_close(a in 0.5f64..1.0, b in 0.5f64..1.0, ea in -60i32..=1, eb in -60i32..=1) {
            let p = Profile::basic();
            let x = Number::from_f64(a * 2f64.powi(ea), p).unwrap();
            let y = Number::from_f64(b * 2f64.powi(eb), p).unwrap();
            let product = multiply(&x, &y, true).unwrap();
            let exact = x.to_f64() * y.to_f64();
            // truncated partial products, magnified by at most one shift
            let tolerance = exact.abs() * 2f64.powi(-9);
            prop_assert!((product.to_f64() - exact).abs() <= tolerance);
            prop_assert!(product.is_normalized());
        }
    }
}
