/*
 * Copyright (c) 2025 The NAMIB Project Developers.
 * Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
 * https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
 * <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
 * option. This file may not be copied, modified, or distributed
 * except according to those terms.
 *
 * SPDX-License-Identifier: MIT OR Apache-2.0
 */

//! The `(kty, alg)` capability registry.
//!
//! Factories are plain function pointers so that registration is
//! idempotent by identity: registering the same factory twice for a pair
//! is a no-op, registering a different one is an error.
//!
//! The [`global`] registry is lazily initialised with the builtin
//! algorithm factories selected by the enabled cargo features.
//! Self-contained deployments can instead construct a private
//! [`Registry`] and register only what they trust.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use crate::error::CoseError;
use crate::key::{Encryptor, Key, Macer, Signer, Verifier};

/// Produces a [`Signer`] from a key holding a private component.
pub type SignerFactory = fn(&Key) -> Result<Box<dyn Signer>, CoseError>;
/// Produces a [`Verifier`] from a key holding a public component.
pub type VerifierFactory = fn(&Key) -> Result<Box<dyn Verifier>, CoseError>;
/// Produces a [`Macer`] from a symmetric key.
pub type MacerFactory = fn(&Key) -> Result<Box<dyn Macer>, CoseError>;
/// Produces an [`Encryptor`] from a symmetric key.
pub type EncryptorFactory = fn(&Key) -> Result<Box<dyn Encryptor>, CoseError>;

/// A table of capability factories keyed by `(kty, alg)`.
///
/// Reads are concurrent; registrations take the write lock and are
/// expected to happen during program initialisation.
#[derive(Default)]
pub struct Registry {
    signers: RwLock<HashMap<(i64, i64), SignerFactory>>,
    verifiers: RwLock<HashMap<(i64, i64), VerifierFactory>>,
    macers: RwLock<HashMap<(i64, i64), MacerFactory>>,
    encryptors: RwLock<HashMap<(i64, i64), EncryptorFactory>>,
}

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::with_builtins);

/// Returns the process-wide registry, populated with the builtin
/// factories.
pub fn global() -> &'static Registry {
    &GLOBAL
}

/// Registers `factory` as the signer factory for `(kty, alg)` in the
/// global registry.
///
/// # Errors
///
/// Fails if a different factory is already registered for the pair.
pub fn register_signer(kty: i64, alg: i64, factory: SignerFactory) -> Result<(), CoseError> {
    global().register_signer(kty, alg, factory)
}

/// Registers `factory` as the verifier factory for `(kty, alg)` in the
/// global registry.
///
/// # Errors
///
/// Fails if a different factory is already registered for the pair.
pub fn register_verifier(kty: i64, alg: i64, factory: VerifierFactory) -> Result<(), CoseError> {
    global().register_verifier(kty, alg, factory)
}

/// Registers `factory` as the MACer factory for `(kty, alg)` in the
/// global registry.
///
/// # Errors
///
/// Fails if a different factory is already registered for the pair.
pub fn register_macer(kty: i64, alg: i64, factory: MacerFactory) -> Result<(), CoseError> {
    global().register_macer(kty, alg, factory)
}

/// Registers `factory` as the encryptor factory for `(kty, alg)` in the
/// global registry.
///
/// # Errors
///
/// Fails if a different factory is already registered for the pair.
pub fn register_encryptor(kty: i64, alg: i64, factory: EncryptorFactory) -> Result<(), CoseError> {
    global().register_encryptor(kty, alg, factory)
}

macro_rules! checked_register {
    ($table:expr, $op:literal, $kty:ident, $alg:ident, $factory:ident) => {{
        let mut table = $table.write().expect("registry lock poisoned");
        match table.get(&($kty, $alg)) {
            Some(existing) if *existing == $factory => Ok(()),
            Some(_) => Err(CoseError::precondition(
                $op,
                "a different factory is already registered for this (kty, alg) pair",
            )),
            None => {
                table.insert(($kty, $alg), $factory);
                Ok(())
            }
        }
    }};
}

macro_rules! lookup_factory {
    ($table:expr, $op:literal, $key:ident) => {{
        $key.check($op)?;
        let (kty, alg) = ($key.kty(), $key.alg());
        let factory = {
            let table = $table.read().expect("registry lock poisoned");
            table.get(&(kty, alg)).copied()
        };
        match factory {
            Some(factory) => factory($key),
            None => Err(CoseError::unsupported($op, kty, alg)),
        }
    }};
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Creates a registry populated with the builtin factories of every
    /// enabled algorithm feature.
    #[must_use]
    pub fn with_builtins() -> Registry {
        let registry = Registry::new();
        registry.install_builtins();
        registry
    }

    /// Registers `factory` as the signer factory for `(kty, alg)`.
    ///
    /// # Errors
    ///
    /// Fails if a different factory is already registered for the pair.
    pub fn register_signer(
        &self,
        kty: i64,
        alg: i64,
        factory: SignerFactory,
    ) -> Result<(), CoseError> {
        checked_register!(self.signers, "registry::register_signer", kty, alg, factory)
    }

    /// Registers `factory` as the verifier factory for `(kty, alg)`.
    ///
    /// # Errors
    ///
    /// Fails if a different factory is already registered for the pair.
    pub fn register_verifier(
        &self,
        kty: i64,
        alg: i64,
        factory: VerifierFactory,
    ) -> Result<(), CoseError> {
        checked_register!(
            self.verifiers,
            "registry::register_verifier",
            kty,
            alg,
            factory
        )
    }

    /// Registers `factory` as the MACer factory for `(kty, alg)`.
    ///
    /// # Errors
    ///
    /// Fails if a different factory is already registered for the pair.
    pub fn register_macer(
        &self,
        kty: i64,
        alg: i64,
        factory: MacerFactory,
    ) -> Result<(), CoseError> {
        checked_register!(self.macers, "registry::register_macer", kty, alg, factory)
    }

    /// Registers `factory` as the encryptor factory for `(kty, alg)`.
    ///
    /// # Errors
    ///
    /// Fails if a different factory is already registered for the pair.
    pub fn register_encryptor(
        &self,
        kty: i64,
        alg: i64,
        factory: EncryptorFactory,
    ) -> Result<(), CoseError> {
        checked_register!(
            self.encryptors,
            "registry::register_encryptor",
            kty,
            alg,
            factory
        )
    }

    /// Produces a [`Signer`] for `key`.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::Unsupported`](crate::error::ErrorKind::Unsupported)
    /// when no factory is registered for the key's `(kty, alg)` pair, or
    /// with the factory's error when the key is unfit for signing.
    pub fn signer(&self, key: &Key) -> Result<Box<dyn Signer>, CoseError> {
        lookup_factory!(self.signers, "registry::signer", key)
    }

    /// Produces a [`Verifier`] for `key`.
    ///
    /// # Errors
    ///
    /// See [`Registry::signer`].
    pub fn verifier(&self, key: &Key) -> Result<Box<dyn Verifier>, CoseError> {
        lookup_factory!(self.verifiers, "registry::verifier", key)
    }

    /// Produces a [`Macer`] for `key`.
    ///
    /// # Errors
    ///
    /// See [`Registry::signer`].
    pub fn macer(&self, key: &Key) -> Result<Box<dyn Macer>, CoseError> {
        lookup_factory!(self.macers, "registry::macer", key)
    }

    /// Produces an [`Encryptor`] for `key`.
    ///
    /// # Errors
    ///
    /// See [`Registry::signer`].
    pub fn encryptor(&self, key: &Key) -> Result<Box<dyn Encryptor>, CoseError> {
        lookup_factory!(self.encryptors, "registry::encryptor", key)
    }

    /// Installs the builtin factories. Direct inserts: the builtin pairs
    /// are disjoint, so this cannot collide.
    #[allow(unused)]
    fn install_builtins(&self) {
        use crate::iana::{alg, key_type};

        #[cfg(feature = "ecdsa")]
        {
            let mut signers = self.signers.write().expect("registry lock poisoned");
            let mut verifiers = self.verifiers.write().expect("registry lock poisoned");
            for a in [alg::ES256, alg::ES384] {
                signers.insert((key_type::EC2, a), super::ecdsa::new_signer as SignerFactory);
                verifiers.insert(
                    (key_type::EC2, a),
                    super::ecdsa::new_verifier as VerifierFactory,
                );
            }
        }

        #[cfg(feature = "ed25519")]
        {
            let mut signers = self.signers.write().expect("registry lock poisoned");
            let mut verifiers = self.verifiers.write().expect("registry lock poisoned");
            signers.insert(
                (key_type::OKP, alg::EDDSA),
                super::ed25519::new_signer as SignerFactory,
            );
            verifiers.insert(
                (key_type::OKP, alg::EDDSA),
                super::ed25519::new_verifier as VerifierFactory,
            );
        }

        #[cfg(feature = "hmac")]
        {
            let mut macers = self.macers.write().expect("registry lock poisoned");
            for a in [
                alg::HMAC_256_64,
                alg::HMAC_256_256,
                alg::HMAC_384_384,
                alg::HMAC_512_512,
            ] {
                macers.insert(
                    (key_type::SYMMETRIC, a),
                    super::hmac::new_macer as MacerFactory,
                );
            }
        }

        #[cfg(any(
            feature = "aes-gcm",
            feature = "aes-ccm",
            feature = "chacha20-poly1305"
        ))]
        {
            let mut encryptors = self.encryptors.write().expect("registry lock poisoned");
            #[cfg(feature = "aes-gcm")]
            let gcm = [alg::A128GCM, alg::A192GCM, alg::A256GCM];
            #[cfg(not(feature = "aes-gcm"))]
            let gcm: [i64; 0] = [];
            #[cfg(feature = "aes-ccm")]
            let ccm = [
                alg::AES_CCM_16_64_128,
                alg::AES_CCM_16_64_256,
                alg::AES_CCM_64_64_128,
                alg::AES_CCM_64_64_256,
                alg::AES_CCM_16_128_128,
                alg::AES_CCM_16_128_256,
                alg::AES_CCM_64_128_128,
                alg::AES_CCM_64_128_256,
            ];
            #[cfg(not(feature = "aes-ccm"))]
            let ccm: [i64; 0] = [];
            #[cfg(feature = "chacha20-poly1305")]
            let chacha = [alg::CHACHA20_POLY1305];
            #[cfg(not(feature = "chacha20-poly1305"))]
            let chacha: [i64; 0] = [];
            for a in gcm.into_iter().chain(ccm).chain(chacha) {
                encryptors.insert(
                    (key_type::SYMMETRIC, a),
                    super::aead::new_encryptor as EncryptorFactory,
                );
            }
        }
    }
}
