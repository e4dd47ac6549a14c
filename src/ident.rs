//! Deterministic box identity.
//!
//! Every placed element gets an ident so a later partial-update pass can
//! recognize "the same" element across regenerations. The ident is role
//! prefix + page number + a disambiguating reference. Callers set a
//! content-derived reference (typically the CMS object id) before emitting
//! related commands; an optional generic postfix disambiguates otherwise
//! identical siblings on the same page. Identical (prefix, page, reference)
//! triples collide on purpose — that collision is the coupling between CMS
//! content and rendered elements.

/// Builds box idents from caller-supplied reference state.
#[derive(Debug, Clone, Default)]
pub struct BoxIdentBuilder {
    reference: String,
    generic_postfix: String,
}

impl BoxIdentBuilder {
    /// Sets the content reference for subsequent idents.
    pub fn set_reference(&mut self, reference: &str) {
        self.reference = reference.to_string();
    }

    /// Appends to the content reference, e.g. a child object id.
    pub fn append_reference(&mut self, reference: &str) {
        self.reference.push_str(reference);
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn set_generic_postfix(&mut self, postfix: &str) {
        self.generic_postfix = postfix.to_string();
    }

    pub fn generic_postfix(&self) -> &str {
        &self.generic_postfix
    }

    /// Builds the ident for one command.
    ///
    /// Without a content reference the ident falls back to `sequence`, the
    /// number of commands already emitted by the queue. That fallback makes
    /// ident assignment a total order over emission order: idents stay
    /// stable as long as the command stream before them does.
    pub fn build(&self, prefix: &str, page_number: i32, sequence: usize) -> String {
        if self.reference.is_empty() {
            return format!("{}{}-#{}", prefix, page_number, sequence);
        }
        if self.generic_postfix.is_empty() {
            format!("{}{}-{}", prefix, page_number, self.reference)
        } else {
            format!("{}{}-{}-{}", prefix, page_number, self.reference, self.generic_postfix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_collision_is_stable() {
        let mut builder = BoxIdentBuilder::default();
        builder.set_reference("product-77");

        // sequence is irrelevant while a reference is set
        assert_eq!(builder.build("Q", 3, 0), builder.build("Q", 3, 9));
        assert_ne!(builder.build("Q", 3, 0), builder.build("Q", 4, 0));
    }

    #[test]
    fn test_postfix_disambiguates_siblings() {
        let mut builder = BoxIdentBuilder::default();
        builder.set_reference("product-77");
        let plain = builder.build("Q", 1, 0);
        builder.set_generic_postfix("price");
        assert_ne!(plain, builder.build("Q", 1, 0));
    }

    #[test]
    fn test_fallback_follows_emission_order() {
        let builder = BoxIdentBuilder::default();
        assert_eq!(builder.build("Q", 1, 0), "Q1-#0");
        assert_eq!(builder.build("Q", 1, 1), "Q1-#1");
    }
}
