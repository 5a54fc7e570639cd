//! Single-owner access control for administrative operations.

use consign_types::{Address, Result, ShopError};

/// Gate that admits exactly one administrative owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControl {
    owner: Address,
}

impl AccessControl {
    /// # Errors
    /// `NullOwner` if `owner` is the null address.
    pub fn new(owner: Address) -> Result<Self> {
        if owner.is_zero() {
            return Err(ShopError::NullOwner);
        }
        Ok(Self { owner })
    }

    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Admit `caller` only if it is the owner.
    ///
    /// # Errors
    /// `NotOwner` for any other caller.
    pub fn ensure_owner(&self, caller: Address) -> Result<()> {
        if caller == self.owner {
            Ok(())
        } else {
            Err(ShopError::NotOwner { caller })
        }
    }

    /// Hand ownership to `new_owner`. Returns the previous owner.
    ///
    /// # Errors
    /// `NullOwner` if `new_owner` is the null address.
    pub fn transfer(&mut self, new_owner: Address) -> Result<Address> {
        if new_owner.is_zero() {
            return Err(ShopError::NullOwner);
        }
        Ok(std::mem::replace(&mut self.owner, new_owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_owner_admitted() {
        let owner = Address::from_low_u64(1);
        let acl = AccessControl::new(owner).unwrap();
        assert!(acl.ensure_owner(owner).is_ok());
        let stranger = Address::from_low_u64(2);
        assert_eq!(
            acl.ensure_owner(stranger),
            Err(ShopError::NotOwner { caller: stranger })
        );
    }

    #[test]
    fn null_owner_rejected() {
        assert_eq!(AccessControl::new(Address::ZERO), Err(ShopError::NullOwner));
        let mut acl = AccessControl::new(Address::from_low_u64(1)).unwrap();
        assert_eq!(acl.transfer(Address::ZERO), Err(ShopError::NullOwner));
        assert_eq!(acl.owner(), Address::from_low_u64(1));
    }

    #[test]
    fn transfer_moves_the_gate() {
        let old = Address::from_low_u64(1);
        let new = Address::from_low_u64(2);
        let mut acl = AccessControl::new(old).unwrap();
        assert_eq!(acl.transfer(new).unwrap(), old);
        assert!(acl.ensure_owner(new).is_ok());
        assert!(acl.ensure_owner(old).is_err());
    }
}
