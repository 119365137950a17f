/// Hundreds, tens and ones of `value`, in that order.
pub fn to_decimal_digits(value: u8) -> [u8; 3] {
    [value / 100, (value / 10) % 10, value % 10]
}
