//! Operator sugar over the named [`PcmAudio`] methods.
//!
//! | expression       | method                    |
//! |------------------|---------------------------|
//! | `a + b`          | [`PcmAudio::concat`]      |
//! | `a * n`, `n * a` | [`PcmAudio::repeat`]      |
//! | `a + db`, `db + a`, `a - db` | [`PcmAudio::gain`] |
//! | `a & b`          | [`PcmAudio::overlay`]     |
//! | `-a`             | [`PcmAudio::invert`]      |
//!
//! Operands may be owned or borrowed.

use std::iter::Sum;
use std::ops::{Add, BitAnd, Mul, Neg, Sub};

use super::audio::PcmAudio;

macro_rules! audio_binop {
    ($trait:ident, $method:ident, $call:ident) => {
        impl $trait<&PcmAudio> for &PcmAudio {
            type Output = PcmAudio;
            fn $method(self, rhs: &PcmAudio) -> PcmAudio {
                self.$call(rhs)
            }
        }

        impl $trait<PcmAudio> for PcmAudio {
            type Output = PcmAudio;
            fn $method(self, rhs: PcmAudio) -> PcmAudio {
                self.$call(&rhs)
            }
        }

        impl $trait<&PcmAudio> for PcmAudio {
            type Output = PcmAudio;
            fn $method(self, rhs: &PcmAudio) -> PcmAudio {
                self.$call(rhs)
            }
        }

        impl $trait<PcmAudio> for &PcmAudio {
            type Output = PcmAudio;
            fn $method(self, rhs: PcmAudio) -> PcmAudio {
                self.$call(&rhs)
            }
        }
    };
}

audio_binop!(Add, add, concat);
audio_binop!(BitAnd, bitand, overlay);

macro_rules! scalar_op {
    ($trait:ident, $method:ident, $scalar:ty, |$audio:ident, $value:ident| $body:expr) => {
        impl $trait<$scalar> for &PcmAudio {
            type Output = PcmAudio;
            fn $method(self, $value: $scalar) -> PcmAudio {
                let $audio = self;
                $body
            }
        }

        impl $trait<$scalar> for PcmAudio {
            type Output = PcmAudio;
            fn $method(self, $value: $scalar) -> PcmAudio {
                let $audio = &self;
                $body
            }
        }

        impl $trait<&PcmAudio> for $scalar {
            type Output = PcmAudio;
            fn $method(self, rhs: &PcmAudio) -> PcmAudio {
                let ($audio, $value) = (rhs, self);
                $body
            }
        }

        impl $trait<PcmAudio> for $scalar {
            type Output = PcmAudio;
            fn $method(self, rhs: PcmAudio) -> PcmAudio {
                let ($audio, $value) = (&rhs, self);
                $body
            }
        }
    };
}

scalar_op!(Add, add, f64, |audio, db| audio.gain(db));
scalar_op!(Mul, mul, usize, |audio, times| audio.repeat(times));

impl Sub<f64> for &PcmAudio {
    type Output = PcmAudio;
    fn sub(self, db: f64) -> PcmAudio {
        self.gain(-db)
    }
}

impl Sub<f64> for PcmAudio {
    type Output = PcmAudio;
    fn sub(self, db: f64) -> PcmAudio {
        self.gain(-db)
    }
}

impl Neg for &PcmAudio {
    type Output = PcmAudio;
    fn neg(self) -> PcmAudio {
        self.invert()
    }
}

impl Neg for PcmAudio {
    type Output = PcmAudio;
    fn neg(self) -> PcmAudio {
        self.invert()
    }
}

impl Sum for PcmAudio {
    fn sum<I: Iterator<Item = PcmAudio>>(iter: I) -> PcmAudio {
        iter.fold(PcmAudio::default(), |acc, a| acc.concat(&a))
    }
}

impl<'a> Sum<&'a PcmAudio> for PcmAudio {
    fn sum<I: Iterator<Item = &'a PcmAudio>>(iter: I) -> PcmAudio {
        iter.fold(PcmAudio::default(), |acc, a| acc.concat(a))
    }
}
