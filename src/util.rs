// Copyright 2024 the chaincollections developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//

/// Finalizing bit mix (the splitmix64 finalizer). Spreads entropy across
/// all 64 bits so that taking the result modulo a bucket count stays well
/// distributed.
#[inline]
pub fn mix64(code: u64) -> u64 {
    let mut r = code;
    r ^= r >> 30;
    r = r.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    r ^= r >> 27;
    r = r.wrapping_mul(0x94d0_49bb_1331_11eb);
    r ^= r >> 31;
    r
}
