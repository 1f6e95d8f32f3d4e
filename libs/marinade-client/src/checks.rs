use anchor_lang::prelude::*;

pub fn check_address(actual: &Pubkey, reference: &Pubkey, field_name: &str) -> Result<()> {
    if actual == reference {
        Ok(())
    } else {
        msg!("Invalid {} {}. Expected {}", field_name, actual, reference);
        Err(Error::from(ProgramError::InvalidArgument)
            .with_account_name(field_name)
            .with_pubkeys((*actual, *reference))
            .with_source(source!()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_address() {
        let expected = Pubkey::new_unique();
        assert!(check_address(&expected, &expected, "reserve").is_ok());
        assert!(check_address(&Pubkey::new_unique(), &expected, "reserve").is_err());
    }
}
