/// Текст как есть; некорректные UTF-8 последовательности заменяются на U+FFFD
pub fn extract(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
