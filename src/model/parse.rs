use std::collections::BTreeSet;
use std::io::BufRead;

use anyhow::{bail, Context, Result};

use super::{Model, Operand, Relation, Statement, VarDecl};

pub fn parse_model_str(s: &str) -> Result<Model> {
    parse_model_reader(std::io::Cursor::new(s.as_bytes()))
}

pub fn parse_model_reader<R: BufRead>(r: R) -> Result<Model> {
    let mut model = Model::default();
    let mut declared = BTreeSet::<String>::new();

    for (idx, line) in r.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.context("failed to read model line")?;
        let clean = strip_comment(&line).trim().to_owned();
        if clean.is_empty() {
            continue;
        }

        if let Some((lhs, rhs)) = clean.split_once('=') {
            let target = parse_operand(lhs.trim())
                .with_context(|| format!("line {}: invalid target", line_no))?;
            let (name, args) =
                parse_call(rhs.trim()).with_context(|| format!("line {}: invalid gate", line_no))?;
            let inputs = parse_operands(&args).with_context(|| format!("line {}", line_no))?;
            let relation = match name.as_str() {
                "BUF" => {
                    let [input] = take_exact::<_, 1>(inputs, &name, line_no)?;
                    Relation::Eq {
                        left: input,
                        right: target,
                    }
                }
                "NOT" => {
                    let [input] = take_exact::<_, 1>(inputs, &name, line_no)?;
                    Relation::Not {
                        left: input,
                        right: target,
                    }
                }
                "AND" => Relation::And { inputs, target },
                _ => bail!("line {}: unsupported gate '{}'", line_no, name),
            };
            model.statements.push(Statement {
                line: line_no,
                relation,
            });
            continue;
        }

        let (name, args) =
            parse_call(&clean).with_context(|| format!("line {}: invalid statement", line_no))?;
        match name.as_str() {
            "BOOL" => {
                if args.is_empty() {
                    bail!("line {}: BOOL needs at least one name", line_no);
                }
                for var in args {
                    declare(&mut model, &mut declared, var, 0, 1, line_no)?;
                }
            }
            "INT" => {
                let [var, min, max] = take_exact::<_, 3>(args, &name, line_no)?;
                let min = parse_int(&min, line_no)?;
                let max = parse_int(&max, line_no)?;
                declare(&mut model, &mut declared, var, min, max, line_no)?;
            }
            "FIX" => {
                let [var, value] = take_exact::<_, 2>(args, &name, line_no)?;
                let value = parse_int(&value, line_no)?;
                if !is_valid_name(&var) {
                    bail!("line {}: invalid name '{}'", line_no, var);
                }
                model.fixes.push((line_no, var, value));
            }
            "ASSERT_LE" => {
                let ops = parse_operands(&args).with_context(|| format!("line {}", line_no))?;
                let [left, right] = take_exact::<_, 2>(ops, &name, line_no)?;
                model.statements.push(Statement {
                    line: line_no,
                    relation: Relation::Le { left, right },
                });
            }
            "ASSERT_OR" => {
                let ops = parse_operands(&args).with_context(|| format!("line {}", line_no))?;
                model.statements.push(Statement {
                    line: line_no,
                    relation: Relation::OrTrue(ops),
                });
            }
            "ASSERT_NAND" => {
                let ops = parse_operands(&args).with_context(|| format!("line {}", line_no))?;
                model.statements.push(Statement {
                    line: line_no,
                    relation: Relation::AndFalse(ops),
                });
            }
            _ => bail!("line {}: unsupported statement '{}'", line_no, name),
        }
    }

    Ok(model)
}

fn declare(
    model: &mut Model,
    declared: &mut BTreeSet<String>,
    name: String,
    min: i64,
    max: i64,
    line_no: usize,
) -> Result<()> {
    if !is_valid_name(&name) {
        bail!("line {}: invalid name '{}'", line_no, name);
    }
    if min > max {
        bail!("line {}: empty domain [{}, {}] for '{}'", line_no, min, max, name);
    }
    if !declared.insert(name.clone()) {
        bail!("line {}: redefinition of '{}'", line_no, name);
    }
    model.vars.push(VarDecl { name, min, max });
    Ok(())
}

fn take_exact<T, const N: usize>(args: Vec<T>, what: &str, line_no: usize) -> Result<[T; N]> {
    let got = args.len();
    match <[T; N]>::try_from(args) {
        Ok(v) => Ok(v),
        Err(_) => bail!(
            "line {}: wrong arity for {}, expected {} args but got {}",
            line_no,
            what,
            N,
            got
        ),
    }
}

fn parse_operands(args: &[String]) -> Result<Vec<Operand>> {
    args.iter().map(|a| parse_operand(a)).collect()
}

fn parse_operand(s: &str) -> Result<Operand> {
    let (negated, name) = match s.strip_prefix('!') {
        Some(rest) => (true, rest.trim()),
        None => (false, s),
    };
    if !is_valid_name(name) {
        bail!("invalid operand '{}'", s);
    }
    Ok(Operand {
        name: name.to_owned(),
        negated,
    })
}

fn parse_int(s: &str, line_no: usize) -> Result<i64> {
    s.parse::<i64>()
        .with_context(|| format!("line {}: invalid integer '{}'", line_no, s))
}

fn parse_call(s: &str) -> Result<(String, Vec<String>)> {
    let open = s
        .find('(')
        .ok_or_else(|| anyhow::anyhow!("missing '(' in expression"))?;
    let close = s
        .rfind(')')
        .ok_or_else(|| anyhow::anyhow!("missing ')' in expression"))?;
    if close < open {
        bail!("malformed expression");
    }
    if !s[close + 1..].trim().is_empty() {
        bail!("trailing tokens after ')'");
    }
    let name = s[..open].trim().to_ascii_uppercase();
    let inside = s[open + 1..close].trim();
    let args = if inside.is_empty() {
        Vec::new()
    } else {
        inside
            .split(',')
            .map(|p| p.trim().to_owned())
            .collect::<Vec<_>>()
    };
    if args.iter().any(|a| a.is_empty()) {
        bail!("empty argument in call");
    }
    Ok((name, args))
}

fn strip_comment(s: &str) -> &str {
    match s.find('#') {
        Some(idx) => &s[..idx],
        None => s,
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
