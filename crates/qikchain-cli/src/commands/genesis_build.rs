//! Genesis build command implementation.

use qikchain_genesis::{build, write_outputs, BuildOptions, BuildResult, OutputTargets};
use serde_json::{json, Map, Value};

use crate::output::format_json;
use crate::BuildArgs;

const SUMMARY_DECIMALS: i32 = 6;

pub fn run(args: BuildArgs) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = args.json;
    let opts = build_options(args);
    let result = build(&opts)?;
    write_outputs(&result)?;

    if json_output {
        println!("{}", format_json(&summary_json(&opts, &result)));
        return Ok(());
    }

    let outputs = &result.outputs;
    println!(
        "Built {} genesis for {} (chain id {})",
        opts.consensus, opts.env, opts.chain_id
    );
    println!("  combined: {}", outputs.combined.display());
    println!("  chain:    {}", outputs.chain.display());
    println!("  genesis:  {}", outputs.genesis.display());
    println!("  metadata: {}", outputs.metadata.display());
    if result.pos_addresses_json.is_some() {
        println!("  pos:      {}", outputs.pos_addresses.display());
    }
    println!(
        "Total premine: {} wei ({} QIK)",
        result.total_premine_wei,
        result.total_premine_qik(SUMMARY_DECIMALS)
    );
    for (name, digest) in result.digests() {
        println!("  {:<13} {}", name, digest);
    }
    Ok(())
}

fn build_options(args: BuildArgs) -> BuildOptions {
    let allocations = args
        .allocations
        .unwrap_or_else(|| BuildOptions::default_allocations(args.env));
    BuildOptions {
        consensus: args.consensus,
        env: args.env,
        template: args.template,
        overlay_dir: args.overlay_dir,
        token: args.token,
        allocations,
        pos_deployments: args.pos_deployments,
        chain_id: args.chain_id,
        gas_limit: args.gas_limit,
        difficulty: args.difficulty,
        extra_data: args.extra_data,
        min_gas_price: args.min_gas_price,
        base_fee_enabled: args.base_fee_enabled,
        strict: args.strict,
        accept_legacy_consensus: args.accept_legacy_consensus,
        allow_missing_pos_addresses: args.allow_missing_pos_addresses,
        pretty: args.pretty,
        supported_forks: args.supported_forks,
        outputs: OutputTargets {
            combined: args.out_combined,
            legacy_out: args.out,
            chain: args.out_chain,
            genesis: args.out_genesis,
            metadata: args.metadata_out,
        },
    }
}

fn summary_json(opts: &BuildOptions, result: &BuildResult) -> Value {
    let outputs = &result.outputs;
    let mut paths = Map::new();
    paths.insert("combined".into(), json!(outputs.combined.to_string_lossy()));
    paths.insert("chain".into(), json!(outputs.chain.to_string_lossy()));
    paths.insert("genesis".into(), json!(outputs.genesis.to_string_lossy()));
    paths.insert("metadata".into(), json!(outputs.metadata.to_string_lossy()));
    if result.pos_addresses_json.is_some() {
        paths.insert("posAddresses".into(), json!(outputs.pos_addresses.to_string_lossy()));
    }
    let digests: Map<String, Value> = result
        .digests()
        .into_iter()
        .map(|(name, digest)| (name.to_string(), json!(digest.to_string())))
        .collect();

    json!({
        "consensus": opts.consensus.as_str(),
        "env": opts.env.as_str(),
        "chainId": opts.chain_id,
        "outputs": paths,
        "digests": digests,
        "totalPremineWei": result.total_premine_wei.to_string(),
        "totalPremineQIK": result.total_premine_qik(SUMMARY_DECIMALS),
        "posAddresses": result.pos_addresses,
        "warnings": result.warnings,
    })
}
