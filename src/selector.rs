use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorAttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
    StartsWith { key: String, value: String },
    EndsWith { key: String, value: String },
    Contains { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct SelectorStep {
    pub(crate) tag: Option<String>,
    pub(crate) universal: bool,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<SelectorAttrCondition>,
}

impl SelectorStep {
    pub(crate) fn id_only(&self) -> Option<&str> {
        if !self.universal && self.tag.is_none() && self.classes.is_empty() && self.attrs.is_empty()
        {
            self.id.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectorCombinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorPart {
    pub(crate) step: SelectorStep,
    // Relation to previous (left) selector part.
    pub(crate) combinator: Option<SelectorCombinator>,
}

pub(crate) fn parse_selector_groups(selector: &str) -> Result<Vec<Vec<SelectorPart>>> {
    let groups = split_selector_groups(selector)?;
    let mut parsed = Vec::with_capacity(groups.len());
    for group in groups {
        parsed.push(parse_selector_chain(&group)?);
    }
    Ok(parsed)
}

fn split_selector_groups(selector: &str) -> Result<Vec<String>> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0usize;

    for ch in selector.chars() {
        match ch {
            '[' => {
                bracket_depth += 1;
                current.push(ch);
            }
            ']' => {
                if bracket_depth == 0 {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                bracket_depth -= 1;
                current.push(ch);
            }
            ',' if bracket_depth == 0 => {
                if current.trim().is_empty() {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                groups.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }

    if bracket_depth != 0 || current.trim().is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    groups.push(current);
    Ok(groups)
}

fn parse_selector_chain(selector: &str) -> Result<Vec<SelectorPart>> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    let tokens = tokenize_selector(selector)?;
    let mut parts = Vec::new();
    let mut pending_combinator: Option<SelectorCombinator> = None;

    for token in tokens {
        if token == ">" {
            if pending_combinator.is_some() || parts.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            pending_combinator = Some(SelectorCombinator::Child);
            continue;
        }
        if token == "+" || token == "~" {
            return Err(Error::UnsupportedSelector(selector.into()));
        }

        let step = parse_selector_step(&token)?;
        let combinator = if parts.is_empty() {
            None
        } else {
            Some(
                pending_combinator
                    .take()
                    .unwrap_or(SelectorCombinator::Descendant),
            )
        };
        parts.push(SelectorPart { step, combinator });
    }

    if parts.is_empty() || pending_combinator.is_some() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    Ok(parts)
}

fn tokenize_selector(selector: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0usize;
    let mut quote: Option<char> = None;

    for ch in selector.chars() {
        if let Some(open) = quote {
            current.push(ch);
            if ch == open {
                quote = None;
            }
            continue;
        }

        match ch {
            '\'' | '"' if bracket_depth > 0 => {
                quote = Some(ch);
                current.push(ch);
            }
            '[' => {
                bracket_depth += 1;
                current.push(ch);
            }
            ']' => {
                if bracket_depth == 0 {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                bracket_depth -= 1;
                current.push(ch);
            }
            '>' | '+' | '~' if bracket_depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(ch.to_string());
            }
            ch if ch.is_whitespace() && bracket_depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }

    if quote.is_some() || bracket_depth != 0 {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

fn parse_selector_step(token: &str) -> Result<SelectorStep> {
    let chars: Vec<char> = token.chars().collect();
    let mut step = SelectorStep::default();
    let mut i = 0usize;

    if i < chars.len() && chars[i] == '*' {
        step.universal = true;
        i += 1;
    } else if i < chars.len() && is_ident_char(chars[i]) {
        let tag = read_ident(&chars, &mut i);
        step.tag = Some(tag.to_ascii_lowercase());
    }

    while i < chars.len() {
        match chars[i] {
            '#' => {
                i += 1;
                let id = read_ident(&chars, &mut i);
                if id.is_empty() {
                    return Err(Error::UnsupportedSelector(token.into()));
                }
                step.id = Some(id);
            }
            '.' => {
                i += 1;
                let class = read_ident(&chars, &mut i);
                if class.is_empty() {
                    return Err(Error::UnsupportedSelector(token.into()));
                }
                step.classes.push(class);
            }
            '[' => {
                i += 1;
                let condition = parse_attr_condition(token, &chars, &mut i)?;
                step.attrs.push(condition);
            }
            _ => return Err(Error::UnsupportedSelector(token.into())),
        }
    }

    if step.tag.is_none()
        && !step.universal
        && step.id.is_none()
        && step.classes.is_empty()
        && step.attrs.is_empty()
    {
        return Err(Error::UnsupportedSelector(token.into()));
    }

    Ok(step)
}

fn parse_attr_condition(
    token: &str,
    chars: &[char],
    i: &mut usize,
) -> Result<SelectorAttrCondition> {
    skip_spaces(chars, i);
    let key = read_ident(chars, i);
    if key.is_empty() {
        return Err(Error::UnsupportedSelector(token.into()));
    }
    skip_spaces(chars, i);

    if *i < chars.len() && chars[*i] == ']' {
        *i += 1;
        return Ok(SelectorAttrCondition::Exists { key });
    }

    let op = match chars.get(*i).copied() {
        Some('=') => {
            *i += 1;
            '='
        }
        Some(op @ ('^' | '$' | '*')) if chars.get(*i + 1) == Some(&'=') => {
            *i += 2;
            op
        }
        _ => return Err(Error::UnsupportedSelector(token.into())),
    };

    skip_spaces(chars, i);
    let value = read_attr_value(token, chars, i)?;
    skip_spaces(chars, i);
    if chars.get(*i) != Some(&']') {
        return Err(Error::UnsupportedSelector(token.into()));
    }
    *i += 1;

    Ok(match op {
        '=' => SelectorAttrCondition::Eq { key, value },
        '^' => SelectorAttrCondition::StartsWith { key, value },
        '$' => SelectorAttrCondition::EndsWith { key, value },
        '*' => SelectorAttrCondition::Contains { key, value },
        _ => unreachable!(),
    })
}

fn read_attr_value(token: &str, chars: &[char], i: &mut usize) -> Result<String> {
    let mut value = String::new();
    match chars.get(*i).copied() {
        Some(quote @ ('\'' | '"')) => {
            *i += 1;
            loop {
                match chars.get(*i).copied() {
                    Some(ch) if ch == quote => {
                        *i += 1;
                        break;
                    }
                    Some(ch) => {
                        value.push(ch);
                        *i += 1;
                    }
                    None => return Err(Error::UnsupportedSelector(token.into())),
                }
            }
        }
        _ => {
            while let Some(ch) = chars.get(*i) {
                if *ch == ']' || ch.is_whitespace() {
                    break;
                }
                value.push(*ch);
                *i += 1;
            }
            if value.is_empty() {
                return Err(Error::UnsupportedSelector(token.into()));
            }
        }
    }
    Ok(value)
}

fn skip_spaces(chars: &[char], i: &mut usize) {
    while chars.get(*i).map(|ch| ch.is_whitespace()).unwrap_or(false) {
        *i += 1;
    }
}

fn read_ident(chars: &[char], i: &mut usize) -> String {
    let start = *i;
    while *i < chars.len() && is_ident_char(chars[*i]) {
        *i += 1;
    }
    chars[start..*i].iter().collect()
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}

pub(crate) fn chain_matches(dom: &Dom, node_id: NodeId, parts: &[SelectorPart]) -> bool {
    let Some((last, rest)) = parts.split_last() else {
        return false;
    };
    if !step_matches(dom, node_id, &last.step) {
        return false;
    }
    if rest.is_empty() {
        return true;
    }

    match last.combinator {
        Some(SelectorCombinator::Child) => match dom.parent(node_id) {
            Some(parent) => chain_matches(dom, parent, rest),
            None => false,
        },
        Some(SelectorCombinator::Descendant) | None => {
            let mut cursor = dom.parent(node_id);
            while let Some(ancestor) = cursor {
                if chain_matches(dom, ancestor, rest) {
                    return true;
                }
                cursor = dom.parent(ancestor);
            }
            false
        }
    }
}

fn step_matches(dom: &Dom, node_id: NodeId, step: &SelectorStep) -> bool {
    let Some(element) = dom.element(node_id) else {
        return false;
    };

    if let Some(tag) = &step.tag {
        if element.tag_name != *tag {
            return false;
        }
    }
    if let Some(id) = &step.id {
        if element.attrs.get("id").map(String::as_str) != Some(id.as_str()) {
            return false;
        }
    }
    for class in &step.classes {
        if !has_class(element, class) {
            return false;
        }
    }
    for condition in &step.attrs {
        let matched = match condition {
            SelectorAttrCondition::Exists { key } => element.attrs.contains_key(key),
            SelectorAttrCondition::Eq { key, value } => {
                element.attrs.get(key).map(String::as_str) == Some(value.as_str())
            }
            SelectorAttrCondition::StartsWith { key, value } => element
                .attrs
                .get(key)
                .map(|attr| attr.starts_with(value.as_str()))
                .unwrap_or(false),
            SelectorAttrCondition::EndsWith { key, value } => element
                .attrs
                .get(key)
                .map(|attr| attr.ends_with(value.as_str()))
                .unwrap_or(false),
            SelectorAttrCondition::Contains { key, value } => element
                .attrs
                .get(key)
                .map(|attr| attr.contains(value.as_str()))
                .unwrap_or(false),
        };
        if !matched {
            return false;
        }
    }
    true
}
