use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use tracing::info;

use classicrypt::modular::keystore;
use classicrypt::session::KeyMaterial;
use classicrypt::{KeyPair, ModularCodec, Mode};

use super::{read_text, Invocation};

pub(crate) struct ModularArgs {
    pub p: Option<u64>,
    pub q: Option<u64>,
    pub e: Option<u64>,
    pub keys: Option<PathBuf>,
    pub mode: Mode,
    pub signature: Option<String>,
    pub text: Option<String>,
}

pub(crate) struct KeygenArgs {
    pub p: Option<u64>,
    pub q: Option<u64>,
    pub bits: Option<u32>,
    pub e: Option<u64>,
}

fn resolve_keys(args: &ModularArgs) -> Result<KeyPair> {
    if let Some(path) = &args.keys {
        return keystore::load(path)
            .with_context(|| format!("cannot load key pair from {}", path.display()));
    }
    match (args.p, args.q) {
        (Some(p), Some(q)) => Ok(KeyPair::generate(p, q, args.e)?),
        _ => bail!("either --keys or both --p and --q are required"),
    }
}

pub(crate) fn run_modular(ctx: &mut Invocation, args: ModularArgs) -> Result<()> {
    let keys = resolve_keys(&args)?;
    let text = read_text(args.text.clone())?;
    let codec = ModularCodec::new(&keys);
    info!(n = keys.n(), e = keys.e(), mode = %args.mode, "running modular cipher");

    if args.mode == Mode::Verify {
        return run_verify(ctx, &keys, &text, args.signature.as_deref());
    }

    let (output, result) = match args.mode {
        Mode::Encode => {
            let output = codec.encode(&text)?;
            let result = output.codes_string();
            (output, result)
        }
        Mode::Sign => {
            let output = codec.sign(&text)?;
            let result = output.codes_string();
            (output, result)
        }
        _ => {
            let output = codec.decode(&text)?;
            let result = output.text.clone();
            (output, result)
        }
    };

    if ctx.show_steps {
        println!("{keys}");
        println!();
        println!("{}", output.trace.render());
        println!();
    }
    println!("{result}");

    ctx.finish(args.mode, KeyMaterial::modular(&keys), &text, &result)
}

/// Checks the signature, records the verdict and fails when it does not
/// match.
fn run_verify(
    ctx: &mut Invocation,
    keys: &KeyPair,
    message: &str,
    signature: Option<&str>,
) -> Result<()> {
    let Some(signature) = signature else {
        bail!("--signature is required in verify mode");
    };
    let checked = ModularCodec::new(keys).verify(message, signature)?;
    let verdict = if checked.valid { "valid" } else { "invalid" };

    if ctx.show_steps {
        println!("{keys}");
        println!();
        println!("{}", checked.trace.render());
        println!();
    }
    println!("signature {verdict}");

    ctx.finish(Mode::Verify, KeyMaterial::modular(keys), message, verdict)?;
    if !checked.valid {
        bail!("signature does not match the message");
    }
    Ok(())
}

pub(crate) fn run_keygen(args: KeygenArgs, save: Option<&Path>) -> Result<()> {
    let keys = match (args.bits, args.p, args.q) {
        (Some(bits), _, _) => KeyPair::random(bits, args.e, &mut rand::thread_rng())?,
        (None, Some(p), Some(q)) => KeyPair::generate(p, q, args.e)?,
        _ => bail!("either --bits or both --p and --q are required"),
    };
    info!(n = keys.n(), e = keys.e(), "key pair derived");
    println!("{keys}");

    if let Some(path) = save {
        keystore::save(&keys, path)
            .with_context(|| format!("cannot save key pair to {}", path.display()))?;
    }
    Ok(())
}
