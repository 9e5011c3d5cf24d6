//! Recursive descent over one line's token stream.
//!
//! Every rule runs in one of two modes. Checking validates syntax with
//! no side effects and is how a line is accepted before it is stored.
//! Executing performs the statement. A rule returns `Ok(None)` when its
//! input does not start here, leaving the cursor where it found it, and
//! `Err` only for a definite error.

use super::runtime::{ForLoop, State};
use super::tty::TtyRequest;
use super::var::{self, Var};
use super::{listing, persist, Function, Operation, Runtime};
use crate::error;
use crate::lang::token::{Cursor, Keyword, Symbol, Token};
use crate::lang::{Error, Line, LineNumber};
use rand::Rng;
use tracing::{debug, trace};

type Result<T> = std::result::Result<T, Error>;

/// Validates a line without touching the machine.
pub fn check(runtime: &mut Runtime, line: LineNumber, tokens: &[u8]) -> Result<()> {
    Eval::new(runtime, line, tokens, false).evaluate()
}

/// Executes a line. Errors without a line number get this line's.
pub fn run(runtime: &mut Runtime, line: LineNumber, tokens: &[u8]) -> Result<()> {
    trace!(?line, "execute");
    Eval::new(runtime, line, tokens, true)
        .evaluate()
        .map_err(|e| match e.line_number() {
            Some(_) => e,
            None => e.in_line_number(line),
        })
}

type Rule<T> = Result<Option<T>>;

struct Eval<'r, 't> {
    rt: &'r mut Runtime,
    cur: Cursor<'t>,
    line: LineNumber,
    exec: bool,
}

fn required<T>(value: Option<T>) -> Result<T> {
    value.ok_or_else(|| error!(SyntaxError))
}

fn is_tty(kw: Keyword) -> bool {
    use Keyword::*;
    matches!(kw, Cls | Con | Coff | At | Ink | Paper)
}

fn loop_slot(name: &str) -> Result<usize> {
    match name.as_bytes() {
        [letter] if letter.is_ascii_uppercase() => Ok((letter - b'A') as usize),
        _ => Err(error!(IllegalFunctionCall)),
    }
}

fn line_target(n: f32) -> Result<u16> {
    let n = n.trunc();
    if n < 1.0 || n > u16::max_value() as f32 {
        return Err(error!(UndefinedLine));
    }
    Ok(n as u16)
}

/// 1-based, inclusive, by character. Out of range bounds clamp.
fn substring(s: &str, start: Option<f32>, end: Option<f32>) -> String {
    let len = s.chars().count() as i64;
    let start = start.map_or(1, |n| n.trunc() as i64).max(1);
    let end = end.map_or(len, |n| n.trunc() as i64).min(len);
    if start > end {
        return String::new();
    }
    s.chars()
        .skip((start - 1) as usize)
        .take((end - start + 1) as usize)
        .collect()
}

impl<'r, 't> Eval<'r, 't> {
    fn new(rt: &'r mut Runtime, line: LineNumber, tokens: &'t [u8], exec: bool) -> Self {
        Eval {
            rt,
            cur: Cursor::new(tokens),
            line,
            exec,
        }
    }

    fn evaluate(&mut self) -> Result<()> {
        match self.statement()? {
            Some(()) if self.cur.is_end() => Ok(()),
            _ => Err(error!(SyntaxError)),
        }
    }

    fn mark(&self) -> usize {
        self.cur.position()
    }

    fn reset(&mut self, mark: usize) {
        self.cur.seek(mark)
    }

    fn peek(&self) -> Option<Token<'t>> {
        self.cur.peek()
    }

    fn accept(&mut self, symbol: Symbol) -> bool {
        if self.peek() == Some(Token::Symbol(symbol)) {
            self.cur.advance()
        } else {
            false
        }
    }

    fn accept_keyword(&mut self, kw: Keyword) -> bool {
        if self.peek() == Some(Token::Keyword(kw)) {
            self.cur.advance()
        } else {
            false
        }
    }

    fn expect(&mut self, symbol: Symbol) -> Result<()> {
        if self.accept(symbol) {
            Ok(())
        } else {
            Err(error!(SyntaxError))
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<()> {
        if self.accept_keyword(kw) {
            Ok(())
        } else {
            Err(error!(SyntaxError))
        }
    }

    fn emit(&mut self, s: &str) {
        if self.exec {
            self.rt.output.print_string(s);
        }
    }

    fn comparison_op(&mut self) -> Option<Symbol> {
        match self.peek() {
            Some(Token::Symbol(op)) if op.is_comparison() => {
                self.cur.advance();
                Some(op)
            }
            _ => None,
        }
    }

    // Numeric expressions

    fn expression(&mut self) -> Rule<f32> {
        let mut lhs = match self.comparison()? {
            Some(n) => n,
            None => return Ok(None),
        };
        loop {
            let mark = self.mark();
            let and = if self.accept_keyword(Keyword::And) {
                true
            } else if self.accept_keyword(Keyword::Or) {
                false
            } else {
                break;
            };
            match self.comparison()? {
                Some(rhs) if and => lhs = Operation::and(lhs, rhs),
                Some(rhs) => lhs = Operation::or(lhs, rhs),
                None => {
                    self.reset(mark);
                    break;
                }
            }
        }
        Ok(Some(lhs))
    }

    fn comparison(&mut self) -> Rule<f32> {
        let mark = self.mark();
        if let Some(lhs) = self.string_expression()? {
            if let Some(op) = self.comparison_op() {
                if let Some(rhs) = self.string_expression()? {
                    return Ok(Some(Operation::compare_strings(op, &lhs, &rhs)));
                }
            }
            self.reset(mark);
        }
        let mut lhs = match self.additive()? {
            Some(n) => n,
            None => return Ok(None),
        };
        loop {
            let mark = self.mark();
            let op = match self.comparison_op() {
                Some(op) => op,
                None => break,
            };
            match self.additive()? {
                Some(rhs) => lhs = Operation::compare(op, lhs, rhs),
                None => {
                    self.reset(mark);
                    break;
                }
            }
        }
        Ok(Some(lhs))
    }

    fn additive(&mut self) -> Rule<f32> {
        use Symbol::*;
        self.binary(&[Plus, Minus, BitAnd, BitOr], Self::multiplicative)
    }

    fn multiplicative(&mut self) -> Rule<f32> {
        use Symbol::*;
        self.binary(&[Multiply, Divide, Modulus], Self::unary)
    }

    /// Left associative. An operator with nothing after it is left for
    /// the caller, so `INK 2 + "X"` ends the number before the `+`.
    fn binary(&mut self, ops: &[Symbol], operand: fn(&mut Self) -> Rule<f32>) -> Rule<f32> {
        let mut lhs = match operand(self)? {
            Some(n) => n,
            None => return Ok(None),
        };
        loop {
            let mark = self.mark();
            let op = match self.peek() {
                Some(Token::Symbol(op)) if ops.contains(&op) => op,
                _ => break,
            };
            self.cur.advance();
            match operand(self)? {
                Some(rhs) => lhs = Operation::binary(op, lhs, rhs),
                None => {
                    self.reset(mark);
                    break;
                }
            }
        }
        Ok(Some(lhs))
    }

    fn unary(&mut self) -> Rule<f32> {
        let mark = self.mark();
        if self.accept(Symbol::Minus) {
            return match self.unary()? {
                Some(n) => Ok(Some(Operation::negate(n))),
                None => {
                    self.reset(mark);
                    Ok(None)
                }
            };
        }
        self.factor()
    }

    fn factor(&mut self) -> Rule<f32> {
        use Keyword::*;
        let mark = self.mark();
        let token = match self.cur.next() {
            Some(token) => token,
            None => return Ok(None),
        };
        let value = match token {
            Token::Number(n) => n,
            Token::NumberVar(name) => self.rt.vars.fetch_number(name),
            Token::Keyword(Pi) => std::f32::consts::PI,
            Token::Keyword(Rnd) => {
                if self.exec {
                    self.rt.rng.gen::<f32>()
                } else {
                    0.0
                }
            }
            Token::Symbol(Symbol::LParen) => match self.expression()? {
                Some(n) if self.accept(Symbol::RParen) => n,
                _ => {
                    self.reset(mark);
                    return Ok(None);
                }
            },
            Token::Keyword(kw) if matches!(kw, Len | Code | Val) => {
                let s = required(self.string_term()?)?;
                match kw {
                    Len => Function::len(&s),
                    Code => Function::code(&s),
                    _ => Function::val(&s),
                }
            }
            Token::Keyword(kw) if kw.is_function() && !matches!(kw, Chr | Str) => {
                let n = required(self.unary()?)?;
                if self.exec {
                    Function::numeric(kw, n)?
                } else {
                    0.0
                }
            }
            _ => {
                self.reset(mark);
                return Ok(None);
            }
        };
        Ok(Some(value))
    }

    // String expressions

    fn string_expression(&mut self) -> Rule<String> {
        let mut s = match self.string_term()? {
            Some(s) => s,
            None => return Ok(None),
        };
        loop {
            let mark = self.mark();
            if !self.accept(Symbol::Plus) {
                break;
            }
            match self.string_term()? {
                Some(rhs) => {
                    s.push_str(&rhs);
                    var::check_length(&s)?;
                }
                None => {
                    self.reset(mark);
                    break;
                }
            }
        }
        Ok(Some(s))
    }

    fn string_term(&mut self) -> Rule<String> {
        let mark = self.mark();
        let token = match self.cur.next() {
            Some(token) => token,
            None => return Ok(None),
        };
        let s = match token {
            Token::String(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Token::StringVar(name) => self.rt.vars.fetch_string(name),
            Token::Keyword(Keyword::Chr) => {
                let n = required(self.unary()?)?;
                if self.exec {
                    Function::chr(n)?
                } else {
                    String::new()
                }
            }
            Token::Keyword(Keyword::Str) => Function::str(required(self.unary()?)?),
            Token::Symbol(Symbol::LParen) => match self.string_expression()? {
                Some(s) if self.accept(Symbol::RParen) => s,
                _ => {
                    self.reset(mark);
                    return Ok(None);
                }
            },
            Token::Keyword(kw) if is_tty(kw) => {
                self.reset(mark);
                match self.tty()? {
                    Some(s) => s,
                    None => return Ok(None),
                }
            }
            _ => {
                self.reset(mark);
                return Ok(None);
            }
        };
        self.slice(s).map(Some)
    }

    /// `(s)`, `(s TO e)`, `(s TO)` or `(TO e)` after a string term.
    fn slice(&mut self, s: String) -> Result<String> {
        let mark = self.mark();
        if !self.accept(Symbol::LParen) {
            return Ok(s);
        }
        let start = self.expression()?;
        let ranged = self.accept_keyword(Keyword::To);
        let end = if ranged { self.expression()? } else { None };
        if (start.is_none() && !ranged) || !self.accept(Symbol::RParen) {
            self.reset(mark);
            return Ok(s);
        }
        Ok(substring(&s, start, end))
    }

    fn tty(&mut self) -> Rule<String> {
        let kw = match self.peek() {
            Some(Token::Keyword(kw)) if is_tty(kw) => kw,
            _ => return Ok(None),
        };
        self.cur.advance();
        let request = match kw {
            Keyword::Cls => TtyRequest::Cls,
            Keyword::Con => TtyRequest::CursorOn,
            Keyword::Coff => TtyRequest::CursorOff,
            Keyword::At => {
                let row = self.byte_argument()?;
                self.expect(Symbol::Comma)?;
                let col = self.byte_argument()?;
                TtyRequest::At { row, col }
            }
            Keyword::Ink => TtyRequest::Ink(self.byte_argument()?),
            _ => TtyRequest::Paper(self.byte_argument()?),
        };
        if !self.exec {
            return Ok(Some(String::new()));
        }
        self.rt.terminal.escape(request).map(Some)
    }

    fn byte_argument(&mut self) -> Result<u8> {
        let n = required(self.expression()?)?.trunc();
        if !self.exec {
            return Ok(0);
        }
        if (0.0..=255.0).contains(&n) {
            Ok(n as u8)
        } else {
            Err(error!(IllegalFunctionCall))
        }
    }

    // Statements

    /// Tries each statement in turn. The first that recognizes its input
    /// wins, so the order here is part of the language.
    fn statement(&mut self) -> Rule<()> {
        let rules: &[fn(&mut Self) -> Rule<()>] = &[
            Self::print,
            Self::input,
            Self::let_statement,
            Self::if_then,
            Self::for_loop,
            Self::next_loop,
            Self::goto,
            Self::gosub,
            Self::return_statement,
            Self::run,
            Self::cont,
            Self::stop,
            Self::new_program,
            Self::clear,
            Self::list,
            Self::save,
            Self::load,
            Self::erase,
            Self::cat,
            Self::rem,
            Self::tty_statement,
            Self::implicit_let,
        ];
        for &rule in rules {
            let mark = self.mark();
            if rule(self)?.is_some() {
                return Ok(Some(()));
            }
            self.reset(mark);
        }
        Ok(None)
    }

    fn print(&mut self) -> Rule<()> {
        if !self.accept_keyword(Keyword::Print) {
            return Ok(None);
        }
        let mut newline = true;
        let mut separated = true;
        while !self.cur.is_end() {
            if self.accept(Symbol::Comma) {
                self.emit(" ");
                newline = false;
                separated = true;
                continue;
            }
            if self.accept(Symbol::Semicolon) {
                newline = false;
                separated = true;
                continue;
            }
            if !separated {
                break;
            }
            if let Some(n) = self.expression()? {
                if self.exec {
                    self.rt.output.print_float(n);
                }
            } else if let Some(s) = self.string_expression()? {
                self.emit(&s);
            } else {
                break;
            }
            newline = true;
            separated = false;
        }
        if newline {
            self.emit("\n");
        }
        Ok(Some(()))
    }

    fn input(&mut self) -> Rule<()> {
        if !self.accept_keyword(Keyword::Input) {
            return Ok(None);
        }
        let mut prompt = None;
        if let Some(Token::String(bytes)) = self.peek() {
            self.cur.advance();
            if !self.accept(Symbol::Comma) && !self.accept(Symbol::Semicolon) {
                return Err(error!(SyntaxError));
            }
            prompt = Some(String::from_utf8_lossy(bytes).into_owned());
        }
        let key = match self.cur.next() {
            Some(Token::NumberVar(name)) => name.to_string(),
            Some(Token::StringVar(name)) => Var::string_key(name),
            _ => return Err(error!(SyntaxError)),
        };
        if self.exec {
            self.emit(prompt.as_deref().unwrap_or("? "));
            self.rt.await_input(key, self.line);
        }
        Ok(Some(()))
    }

    fn let_statement(&mut self) -> Rule<()> {
        if !self.accept_keyword(Keyword::Let) {
            return Ok(None);
        }
        required(self.assignment()?).map(Some)
    }

    fn implicit_let(&mut self) -> Rule<()> {
        self.assignment()
    }

    fn assignment(&mut self) -> Rule<()> {
        match self.cur.next() {
            Some(Token::NumberVar(name)) => {
                self.expect(Symbol::Equal)?;
                let n = required(self.expression()?)?;
                if self.exec {
                    self.rt.vars.store_number(name, n)?;
                }
            }
            Some(Token::StringVar(name)) => {
                self.expect(Symbol::Equal)?;
                let s = required(self.string_expression()?)?;
                if self.exec {
                    self.rt.vars.store_string(name, s)?;
                }
            }
            _ => return Ok(None),
        }
        Ok(Some(()))
    }

    fn if_then(&mut self) -> Rule<()> {
        if !self.accept_keyword(Keyword::If) {
            return Ok(None);
        }
        let condition = required(self.expression()?)?;
        self.expect_keyword(Keyword::Then)?;
        if self.exec && condition == 0.0 {
            self.cur.rest();
            return Ok(Some(()));
        }
        if let Some(Token::Number(n)) = self.peek() {
            self.cur.advance();
            if self.exec {
                self.jump(line_target(n)?)?;
            }
            return Ok(Some(()));
        }
        required(self.statement()?).map(Some)
    }

    fn for_loop(&mut self) -> Rule<()> {
        if !self.accept_keyword(Keyword::For) {
            return Ok(None);
        }
        let name = match self.cur.next() {
            Some(Token::NumberVar(name)) => name,
            _ => return Err(error!(SyntaxError)),
        };
        self.expect(Symbol::Equal)?;
        let start = required(self.expression()?)?;
        self.expect_keyword(Keyword::To)?;
        let limit = required(self.expression()?)?;
        let step = if self.accept_keyword(Keyword::Step) {
            required(self.expression()?)?
        } else {
            1.0
        };
        if !self.exec {
            return Ok(Some(()));
        }
        let line = self.line.ok_or_else(|| error!(IllegalDirect))?;
        let slot = loop_slot(name)?;
        // An active loop keeps its first claim. NEXT jumps back here.
        if self.rt.loops[slot].is_some() {
            return Ok(Some(()));
        }
        self.rt.vars.store_number(name, start)?;
        self.rt.loops[slot] = Some(ForLoop { limit, step, line });
        Ok(Some(()))
    }

    fn next_loop(&mut self) -> Rule<()> {
        if !self.accept_keyword(Keyword::Next) {
            return Ok(None);
        }
        let name = match self.cur.next() {
            Some(Token::NumberVar(name)) => name,
            _ => return Err(error!(SyntaxError)),
        };
        if !self.exec {
            return Ok(Some(()));
        }
        self.line.ok_or_else(|| error!(IllegalDirect))?;
        let slot = loop_slot(name)?;
        let active = self.rt.loops[slot].ok_or_else(|| error!(NextWithoutFor))?;
        let value = self.rt.vars.fetch_number(name) + active.step;
        self.rt.vars.store_number(name, value)?;
        let again = if active.step >= 0.0 {
            value <= active.limit
        } else {
            value >= active.limit
        };
        if again {
            self.rt.pc = Some(active.line);
            self.rt.redirected = true;
        } else {
            self.rt.loops[slot] = None;
        }
        Ok(Some(()))
    }

    /// Transfers control. From a direct command this starts the program
    /// without clearing anything.
    fn jump(&mut self, target: u16) -> Result<()> {
        if self.rt.program.find(target).is_none() {
            return Err(error!(UndefinedLine));
        }
        self.rt.pc = Some(target);
        self.rt.redirected = true;
        if self.rt.state == State::Halted {
            self.rt.state = State::Running;
            debug!(line = target, "running");
        }
        Ok(())
    }

    fn goto(&mut self) -> Rule<()> {
        if !self.accept_keyword(Keyword::Goto) {
            return Ok(None);
        }
        let n = required(self.expression()?)?;
        if self.exec {
            self.jump(line_target(n)?)?;
        }
        Ok(Some(()))
    }

    fn gosub(&mut self) -> Rule<()> {
        if !self.accept_keyword(Keyword::Gosub) {
            return Ok(None);
        }
        let n = required(self.expression()?)?;
        if self.exec {
            let line = self.line.ok_or_else(|| error!(IllegalDirect))?;
            let target = line_target(n)?;
            if self.rt.program.find(target).is_none() {
                return Err(error!(UndefinedLine));
            }
            self.rt.gosub.push(line)?;
            self.jump(target)?;
        }
        Ok(Some(()))
    }

    fn return_statement(&mut self) -> Rule<()> {
        if !self.accept_keyword(Keyword::Return) {
            return Ok(None);
        }
        if self.exec {
            self.line.ok_or_else(|| error!(IllegalDirect))?;
            let from = self.rt.gosub.pop()?;
            self.rt.pc = self.rt.program.next(from).map(Line::number);
            self.rt.redirected = true;
        }
        Ok(Some(()))
    }

    fn run(&mut self) -> Rule<()> {
        if !self.accept_keyword(Keyword::Run) {
            return Ok(None);
        }
        if self.exec {
            self.rt.clear();
            self.rt.cont = None;
            self.rt.pc = self.rt.program.first().map(Line::number);
            self.rt.redirected = true;
            if self.rt.pc.is_some() {
                self.rt.state = State::Running;
                debug!("running");
            }
        }
        Ok(Some(()))
    }

    fn cont(&mut self) -> Rule<()> {
        if !self.accept_keyword(Keyword::Cont) {
            return Ok(None);
        }
        if self.exec {
            match self.rt.cont.take() {
                Some(n) if self.rt.program.find(n).is_some() => {
                    self.rt.pc = Some(n);
                    self.rt.redirected = true;
                    self.rt.state = State::Running;
                    debug!(line = n, "continuing");
                }
                _ => return Err(error!(CantContinue)),
            }
        }
        Ok(Some(()))
    }

    fn stop(&mut self) -> Rule<()> {
        if !self.accept_keyword(Keyword::Stop) {
            return Ok(None);
        }
        if self.exec {
            if let Some(line) = self.line {
                self.rt.cont = self.rt.program.next(line).map(Line::number);
            }
            return Err(error!(Break));
        }
        Ok(Some(()))
    }

    fn new_program(&mut self) -> Rule<()> {
        if !self.accept_keyword(Keyword::New) {
            return Ok(None);
        }
        if self.exec {
            self.rt.new_program();
            self.rt.redirected = true;
        }
        Ok(Some(()))
    }

    fn clear(&mut self) -> Rule<()> {
        if !self.accept_keyword(Keyword::Clear) {
            return Ok(None);
        }
        if self.exec {
            self.rt.clear();
        }
        Ok(Some(()))
    }

    fn list(&mut self) -> Rule<()> {
        if !self.accept_keyword(Keyword::List) {
            return Ok(None);
        }
        let start = self.expression()?;
        let count = match start {
            Some(_) if self.accept(Symbol::Comma) => Some(required(self.expression()?)?),
            _ => None,
        };
        if self.exec {
            let start = start.map_or(0.0, f32::trunc).max(0.0).min(u16::max_value() as f32) as u16;
            let count = count.map(|n| n.trunc().max(0.0) as usize);
            listing::list(&self.rt.program, self.rt.output.as_mut(), start, count);
        }
        Ok(Some(()))
    }

    fn file_name(&mut self) -> Result<String> {
        required(self.string_expression()?)
    }

    fn save(&mut self) -> Rule<()> {
        if !self.accept_keyword(Keyword::Save) {
            return Ok(None);
        }
        let name = self.file_name()?;
        if self.exec {
            let rt = &mut *self.rt;
            persist::save(&rt.program, &rt.vars, rt.disk.as_mut(), &name)?;
        }
        Ok(Some(()))
    }

    fn load(&mut self) -> Rule<()> {
        if !self.accept_keyword(Keyword::Load) {
            return Ok(None);
        }
        let name = self.file_name()?;
        if self.exec {
            self.rt.new_program();
            self.rt.redirected = true;
            let rt = &mut *self.rt;
            persist::load(&mut rt.program, &mut rt.vars, rt.disk.as_mut(), &name)?;
        }
        Ok(Some(()))
    }

    fn erase(&mut self) -> Rule<()> {
        if !self.accept_keyword(Keyword::Erase) {
            return Ok(None);
        }
        let name = self.file_name()?;
        if self.exec {
            persist::erase(self.rt.disk.as_mut(), &name)?;
        }
        Ok(Some(()))
    }

    fn cat(&mut self) -> Rule<()> {
        if !self.accept_keyword(Keyword::Cat) {
            return Ok(None);
        }
        if self.exec {
            let rt = &mut *self.rt;
            listing::catalog(rt.disk.as_mut(), rt.output.as_mut())?;
        }
        Ok(Some(()))
    }

    fn rem(&mut self) -> Rule<()> {
        if !self.accept_keyword(Keyword::Rem) {
            return Ok(None);
        }
        self.cur.rest();
        Ok(Some(()))
    }

    /// A bare CLS, AT, INK and so on prints its escape sequence.
    fn tty_statement(&mut self) -> Rule<()> {
        match self.tty()? {
            Some(s) => {
                self.emit(&s);
                Ok(Some(()))
            }
            None => Ok(None),
        }
    }
}
