/// Used with `skip_serializing_if` to keep unset flags out of the serialized config.
pub(crate) fn is_false(value: &bool) -> bool {
    !value
}
