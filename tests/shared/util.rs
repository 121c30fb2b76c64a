/* ************************************************************************ **
** This file is part of rsp2, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of rsp2 is provided under this permissive license, **
** and that the project as a whole is licensed under the GPL 3.0.           **
** ************************************************************************ */

use rsp2_pairsum::value_tolerance;

pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env().is_test(true).try_init();
}

/// Panic unless two value vectors agree within the tolerance of the verifying
/// evaluator.
pub fn assert_values_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "value lengths differ");
    let eps = value_tolerance(expected);
    for (k, (a, b)) in actual.iter().zip(expected).enumerate() {
        if !((a - b).abs() <= eps) {
            panic!(
                "not nearly equal at index {} (tolerance: {:e})\n left: {:?}\nright: {:?}",
                k, eps, actual, expected,
            );
        }
    }
}
